use std::sync::{Arc, OnceLock};

use tracing::{error, info};

use quizwire::auth::Credentials;
use quizwire::config::load_config;
use quizwire::session::{Session, SessionConfig, SessionHooks};
use quizwire::utils::logging;

const DEMO_TOPIC: &str = "/topic/greetings";
const DEMO_DESTINATION: &str = "/app/hello";
const DEMO_PAYLOAD: &str = r#"{"name": "Test"}"#;

/// Wire-test console: connects to the broker, subscribes to a topic, sends
/// one greeting, and prints everything received until interrupted.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let settings = load_config().expect("Failed to load configuration");
    logging::init(&settings.log.level);

    let config = SessionConfig::from_settings(&settings)
        .with_credentials(Credentials::demo(settings.client.name.clone()));
    info!("connecting to {}", config.endpoint);

    // The session is handed to its own connect hook through this cell so it
    // can re-subscribe after every reconnect.
    let cell: Arc<OnceLock<Session>> = Arc::new(OnceLock::new());

    let hook_cell = cell.clone();
    let hooks = SessionHooks::new()
        .on_connect(move || {
            let Some(session) = hook_cell.get() else {
                return;
            };
            info!("connected, subscribing to {DEMO_TOPIC}");
            let _ = session.subscribe(DEMO_TOPIC, |payload| {
                info!("received from {DEMO_TOPIC}: {payload}");
            });
            if let Err(err) = session.publish(DEMO_DESTINATION, DEMO_PAYLOAD) {
                error!("failed to publish greeting: {err}");
            }
        })
        .on_disconnect(|| info!("disconnected"))
        .on_error(|message| error!("broker reported error: {message}"));

    let session = Session::new(config, hooks);
    let _ = cell.set(session.clone());

    session.connect();

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl-c");
    session.disconnect();
}
