use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::Credentials;
use crate::config::Settings;
use crate::session::state::ConnectionState;
use crate::session::subscription::{Subscription, SubscriptionEntry};
use crate::transport::frame::ClientFrame;
use crate::transport::socket::{self, Command};
use crate::utils::error::SessionError;

/// Configuration for a realtime session.
///
/// The defaults mirror the quiz platform's broker setup: a fixed 5 second
/// reconnect delay (no backoff) and 4 second keepalives in both directions.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub endpoint: String,
    pub client_name: String,
    pub reconnect_delay: Duration,
    pub heartbeat_interval: Duration,
    pub credentials: Option<Credentials>,
}

impl SessionConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client_name: "quizwire".to_string(),
            reconnect_delay: Duration::from_millis(5000),
            heartbeat_interval: Duration::from_millis(4000),
            credentials: None,
        }
    }

    /// Builds a session configuration from loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: settings.socket.endpoint.clone(),
            client_name: settings.client.name.clone(),
            reconnect_delay: Duration::from_millis(settings.socket.reconnect_delay_ms),
            heartbeat_interval: Duration::from_millis(settings.socket.heartbeat_interval_ms),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }
}

/// Lifecycle hooks invoked by the socket worker.
///
/// `on_connect` runs after every successful connection, including automatic
/// reconnections, and is the place to (re-)subscribe. `on_error` receives
/// broker-reported protocol errors; the connection is considered lost after
/// one. `on_disconnect` runs when an established connection ends, whether
/// by an explicit `disconnect` or a transport drop.
#[derive(Clone, Default)]
pub struct SessionHooks {
    pub(crate) on_connect: Option<Arc<dyn Fn() + Send + Sync>>,
    pub(crate) on_disconnect: Option<Arc<dyn Fn() + Send + Sync>>,
    pub(crate) on_error: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

impl SessionHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_connect(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_connect = Some(Arc::new(hook));
        self
    }

    pub fn on_disconnect(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_disconnect = Some(Arc::new(hook));
        self
    }

    pub fn on_error(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }
}

pub(crate) struct SharedState {
    pub(crate) state: ConnectionState,
    pub(crate) session_id: Option<String>,
    pub(crate) subscriptions: HashMap<String, SubscriptionEntry>,
    pub(crate) command_tx: Option<UnboundedSender<Command>>,
    pub(crate) generation: u64,
}

/// State shared between session handles and the socket worker.
pub(crate) struct SessionInner {
    pub(crate) config: SessionConfig,
    pub(crate) hooks: SessionHooks,
    pub(crate) shared: Mutex<SharedState>,
}

impl SessionInner {
    pub(crate) fn connect_frame(&self) -> ClientFrame {
        let credentials = self.config.credentials.as_ref();
        ClientFrame::Connect {
            client: self.config.client_name.clone(),
            username: credentials.map(|c| c.username().to_string()),
            token: credentials.map(|c| c.token().to_string()),
        }
    }

    /// Marks this worker generation as attempting a connection. Returns
    /// false when a newer `connect` call has superseded the worker.
    pub(crate) fn begin_connecting(&self, generation: u64) -> bool {
        let mut shared = self.shared.lock().unwrap();
        if shared.generation != generation {
            return false;
        }
        shared.state = ConnectionState::Connecting;
        true
    }

    pub(crate) fn mark_connected(&self, generation: u64, session_id: String) -> bool {
        {
            let mut shared = self.shared.lock().unwrap();
            if shared.generation != generation {
                return false;
            }
            shared.state = ConnectionState::Connected;
            shared.session_id = Some(session_id);
        }
        if let Some(hook) = &self.hooks.on_connect {
            hook();
        }
        true
    }

    /// Transitions out of an attempt or an established connection.
    ///
    /// The subscription set is cleared and is not restored by the automatic
    /// reconnect; callers re-subscribe from their connect hook.
    pub(crate) fn mark_connection_lost(&self, generation: u64) {
        let was_connected = {
            let mut shared = self.shared.lock().unwrap();
            if shared.generation != generation {
                return;
            }
            let was_connected = shared.state == ConnectionState::Connected;
            shared.state = ConnectionState::Disconnected;
            shared.session_id = None;
            shared.subscriptions.clear();
            was_connected
        };
        if was_connected {
            if let Some(hook) = &self.hooks.on_disconnect {
                hook();
            }
        }
    }

    pub(crate) fn worker_finished(&self, generation: u64) {
        let mut shared = self.shared.lock().unwrap();
        if shared.generation != generation {
            return;
        }
        shared.command_tx = None;
        shared.state = ConnectionState::Disconnected;
        shared.session_id = None;
        shared.subscriptions.clear();
    }

    pub(crate) fn report_error(&self, message: &str) {
        warn!("broker reported error: {message}");
        if let Some(hook) = &self.hooks.on_error {
            hook(message);
        }
    }

    /// Invokes every callback registered for `destination`.
    ///
    /// Callbacks are cloned out of the table first so a callback can call
    /// back into the session without deadlocking.
    pub(crate) fn dispatch(&self, destination: &str, payload: &str) {
        let callbacks: Vec<_> = {
            let shared = self.shared.lock().unwrap();
            shared
                .subscriptions
                .values()
                .filter(|entry| entry.destination == destination)
                .map(|entry| entry.callback.clone())
                .collect()
        };
        if callbacks.is_empty() {
            debug!("no subscription for {destination}");
        }
        for callback in callbacks {
            callback(payload);
        }
    }

    pub(crate) fn unsubscribe(&self, id: &str) {
        let mut shared = self.shared.lock().unwrap();
        if shared.subscriptions.remove(id).is_none() {
            return;
        }
        if shared.state == ConnectionState::Connected {
            if let Some(tx) = &shared.command_tx {
                let _ = tx.send(Command::Frame(ClientFrame::Unsubscribe {
                    id: id.to_string(),
                }));
            }
        }
    }
}

/// One logical connection to the quiz message broker.
///
/// A session is created disconnected; `connect` starts a background worker
/// that establishes the connection, keeps it alive with periodic keepalives,
/// and re-enters the connect loop after a fixed delay whenever the transport
/// drops. Handles are cheap to clone and share the same underlying session.
///
/// Subscriptions do **not** survive a reconnect: the subscription set is
/// cleared on every drop, and callers re-subscribe from the `on_connect`
/// hook. Publish and subscribe while not connected are reported and dropped
/// rather than queued.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn new(config: SessionConfig, hooks: SessionHooks) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                config,
                hooks,
                shared: Mutex::new(SharedState {
                    state: ConnectionState::Disconnected,
                    session_id: None,
                    subscriptions: HashMap::new(),
                    command_tx: None,
                    generation: 0,
                }),
            }),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.inner.shared.lock().unwrap().state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Broker-assigned session identifier, present while connected.
    pub fn session_id(&self) -> Option<String> {
        self.inner.shared.lock().unwrap().session_id.clone()
    }

    /// Starts the connection attempt. Does not block; progress is reported
    /// through the lifecycle hooks and [`Session::state`].
    ///
    /// Calling `connect` while the session is already active is a no-op.
    /// Must be called within a tokio runtime.
    pub fn connect(&self) {
        let generation;
        let command_rx;
        {
            let mut shared = self.inner.shared.lock().unwrap();
            if shared.command_tx.is_some() {
                debug!("connect called while session already active");
                return;
            }
            shared.generation += 1;
            generation = shared.generation;
            let (tx, rx) = mpsc::unbounded_channel();
            shared.command_tx = Some(tx);
            shared.state = ConnectionState::Connecting;
            command_rx = rx;
        }
        tokio::spawn(socket::run_worker(
            Arc::downgrade(&self.inner),
            generation,
            command_rx,
        ));
    }

    /// Gracefully tears down the connection. No-op when already inactive.
    pub fn disconnect(&self) {
        let (tx, was_connected) = {
            let mut shared = self.inner.shared.lock().unwrap();
            let Some(tx) = shared.command_tx.take() else {
                debug!("disconnect called while session inactive");
                return;
            };
            let was_connected = shared.state == ConnectionState::Connected;
            shared.state = ConnectionState::Disconnected;
            shared.session_id = None;
            shared.subscriptions.clear();
            (tx, was_connected)
        };
        let _ = tx.send(Command::Shutdown);
        if was_connected {
            if let Some(hook) = &self.inner.hooks.on_disconnect {
                hook();
            }
        }
    }

    /// Registers `callback` for every message delivered on `destination`.
    ///
    /// Returns `None` when the session is not connected; the request is not
    /// queued for later. Several subscriptions may target the same topic.
    pub fn subscribe<F>(&self, destination: impl Into<String>, callback: F) -> Option<Subscription>
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let destination = destination.into();
        let (id, tx) = {
            let mut shared = self.inner.shared.lock().unwrap();
            if shared.state != ConnectionState::Connected {
                warn!("cannot subscribe to {destination}: session is not connected");
                return None;
            }
            let Some(tx) = shared.command_tx.clone() else {
                return None;
            };
            let id = format!("sub-{}", Uuid::new_v4());
            shared.subscriptions.insert(
                id.clone(),
                SubscriptionEntry {
                    destination: destination.clone(),
                    callback: Arc::new(callback),
                },
            );
            (id, tx)
        };

        let frame = ClientFrame::Subscribe {
            id: id.clone(),
            destination,
        };
        if tx.send(Command::Frame(frame)).is_err() {
            warn!("subscribe dropped: session worker is gone");
            self.inner.shared.lock().unwrap().subscriptions.remove(&id);
            return None;
        }

        Some(Subscription {
            inner: self.inner.clone(),
            id,
        })
    }

    /// Sends `payload` to `destination` immediately if connected.
    ///
    /// While not connected the message is dropped and an error returned;
    /// nothing is queued and nothing panics.
    pub fn publish(
        &self,
        destination: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<(), SessionError> {
        let destination = destination.into();
        let tx = {
            let shared = self.inner.shared.lock().unwrap();
            if shared.state != ConnectionState::Connected {
                warn!("cannot publish to {destination}: session is not connected");
                return Err(SessionError::NotConnected);
            }
            shared
                .command_tx
                .clone()
                .ok_or(SessionError::NotConnected)?
        };

        let frame = ClientFrame::Send {
            destination,
            payload: payload.into(),
            timestamp: Utc::now().timestamp_millis(),
        };
        tx.send(Command::Frame(frame))
            .map_err(|_| SessionError::ChannelClosed)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.inner.config.endpoint)
            .field("state", &self.state())
            .finish()
    }
}
