use serde::Deserialize;

/// Top-level configuration settings for the client.
///
/// Includes settings for the socket transport, the client identity, and logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub socket: SocketSettings,
    pub client: ClientSettings,
    pub log: LogSettings,
}

/// Configuration settings for the socket transport.
///
/// Defines the broker endpoint and the reconnect/keepalive cadence.
#[derive(Debug, Deserialize, Clone)]
pub struct SocketSettings {
    pub endpoint: String,
    pub reconnect_delay_ms: u64,
    pub heartbeat_interval_ms: u64,
}

/// Configuration settings for the client identity.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientSettings {
    pub name: String,
}

/// Configuration settings for logging.
#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub socket: Option<PartialSocketSettings>,
    pub client: Option<PartialClientSettings>,
    pub log: Option<PartialLogSettings>,
}

/// Partial socket settings.
///
/// Used when loading socket configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialSocketSettings {
    pub endpoint: Option<String>,
    pub reconnect_delay_ms: Option<u64>,
    pub heartbeat_interval_ms: Option<u64>,
}

/// Partial client settings.
#[derive(Debug, Deserialize)]
pub struct PartialClientSettings {
    pub name: Option<String>,
}

/// Partial log settings.
#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Ensures the client has sensible defaults if no configuration is provided.
/// The endpoint and cadence defaults match the quiz platform's broker setup:
/// a fixed 5 second reconnect delay and 4 second keepalives in both directions.
impl Default for Settings {
    fn default() -> Self {
        Self {
            socket: SocketSettings {
                endpoint: "ws://127.0.0.1:8080/ws".to_string(),
                reconnect_delay_ms: 5000,
                heartbeat_interval_ms: 4000,
            },
            client: ClientSettings {
                name: "quizwire".to_string(),
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}
