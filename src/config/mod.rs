mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{ClientSettings, LogSettings, Settings, SocketSettings};

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the socket, client and log configurations
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        socket: SocketSettings {
            endpoint: partial
                .socket
                .as_ref()
                .and_then(|s| s.endpoint.clone())
                .unwrap_or(default.socket.endpoint),
            reconnect_delay_ms: partial
                .socket
                .as_ref()
                .and_then(|s| s.reconnect_delay_ms)
                .unwrap_or(default.socket.reconnect_delay_ms),
            heartbeat_interval_ms: partial
                .socket
                .as_ref()
                .and_then(|s| s.heartbeat_interval_ms)
                .unwrap_or(default.socket.heartbeat_interval_ms),
        },
        client: ClientSettings {
            name: partial
                .client
                .as_ref()
                .and_then(|c| c.name.clone())
                .unwrap_or(default.client.name),
        },
        log: LogSettings {
            level: partial
                .log
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.log.level),
        },
    })
}

#[cfg(test)]
mod tests;
