use super::load_config;
use super::settings::Settings;
use serial_test::serial;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.socket.endpoint, "ws://127.0.0.1:8080/ws");
    assert_eq!(settings.socket.reconnect_delay_ms, 5000);
    assert_eq!(settings.socket.heartbeat_interval_ms, 4000);
    assert_eq!(settings.client.name, "quizwire");
    assert_eq!(settings.log.level, "info");
}

#[test]
#[serial]
fn test_load_config_uses_defaults_without_sources() {
    let settings = load_config().expect("load_config");
    assert_eq!(settings.socket.reconnect_delay_ms, 5000);
    assert_eq!(settings.client.name, "quizwire");
}

#[test]
#[serial]
fn test_environment_overrides_endpoint() {
    temp_env::with_var("SOCKET_ENDPOINT", Some("ws://broker.test:9000/ws"), || {
        let settings = load_config().expect("load_config");
        assert_eq!(settings.socket.endpoint, "ws://broker.test:9000/ws");
    });
}
