use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub server: ServerSettings,
    pub hub: HubSettings,
    pub subscriber: SubscriberSettings,
}

impl Settings {
    /// Built-in defaults, then `config/{RUN_MODE}.toml` if present, then
    /// `APP_`-prefixed environment variables (e.g. `APP_SERVER__PORT=4001`).
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let defaults = Settings::default();

        let s = Config::builder()
            .set_default("logging.directory", defaults.logging.directory)?
            .set_default("logging.filename", defaults.logging.filename)?
            .set_default("server.bind_address", defaults.server.bind_address)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("server.log_level", defaults.server.log_level)?
            .set_default("server.board_url", defaults.server.board_url)?
            .set_default(
                "server.shutdown_timeout_seconds",
                defaults.server.shutdown_timeout_seconds,
            )?
            .set_default(
                "hub.subscriber_queue_capacity",
                defaults.hub.subscriber_queue_capacity as u64,
            )?
            .set_default("hub.retry_interval_ms", defaults.hub.retry_interval_ms)?
            .set_default(
                "subscriber.write_timeout_seconds",
                defaults.subscriber.write_timeout_seconds,
            )?
            .add_source(
                File::with_name(&format!("config/{}", run_mode))
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
    /// Base URL of the board viewer that renders the event stream.
    pub board_url: String,
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 4000,
            log_level: "info".to_string(),
            board_url: "http://localhost:3000".to_string(),
            shutdown_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub directory: String,
    pub filename: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            filename: "board_server.log".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HubSettings {
    pub subscriber_queue_capacity: usize,
    pub retry_interval_ms: u64,
}

impl HubSettings {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            subscriber_queue_capacity: 100,
            retry_interval_ms: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubscriberSettings {
    pub write_timeout_seconds: u64,
}

impl SubscriberSettings {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_seconds)
    }
}

impl Default for SubscriberSettings {
    fn default() -> Self {
        Self {
            write_timeout_seconds: 10,
        }
    }
}
