//! Application configuration schemas.
//!
//! All configuration structs are deserialized from a TOML file via the
//! `config` crate, overlaid with `KEEPER__`-prefixed environment variables.
//! Every section carries serde defaults so an empty file is a valid
//! configuration.

pub mod channels;
pub mod logging;
pub mod notifier;

use serde::{Deserialize, Serialize};

pub use self::channels::{
    ChannelsConfig, EmailChannelConfig, EmailTransport, SmsChannelConfig, SmsTransport,
};
pub use self::logging::LoggingConfig;
pub use self::notifier::{GateBackend, GateConfig, NotifierConfig};

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Expiration notification engine settings.
    #[serde(default)]
    pub notifier: NotifierConfig,
    /// Delivery channel settings.
    #[serde(default)]
    pub channels: ChannelsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Whether the server applies pending migrations on startup.
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
            auto_migrate: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional; values from environment variables prefixed
    /// with `KEEPER__` (e.g. `KEEPER__NOTIFIER__SCAN_INTERVAL_SECONDS`)
    /// take precedence.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("KEEPER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        let n = &self.notifier;
        if n.scan_interval_seconds == 0 {
            return Err(AppError::configuration(
                "notifier.scan_interval_seconds must be greater than zero",
            ));
        }
        if n.gate.cleanup_interval_seconds == 0 {
            return Err(AppError::configuration(
                "notifier.gate.cleanup_interval_seconds must be greater than zero",
            ));
        }
        if n.dispatch_concurrency == 0 {
            return Err(AppError::configuration(
                "notifier.dispatch_concurrency must be at least 1",
            ));
        }
        if n.default_lookahead_days > n.max_lookahead_days {
            return Err(AppError::configuration(format!(
                "notifier.default_lookahead_days ({}) exceeds max_lookahead_days ({})",
                n.default_lookahead_days, n.max_lookahead_days
            )));
        }
        if self.channels.email.transport == EmailTransport::Smtp
            && self.channels.email.smtp_host.is_empty()
        {
            return Err(AppError::configuration(
                "channels.email.smtp_host is required for the smtp transport",
            ));
        }
        if self.channels.sms.transport == SmsTransport::Http && self.channels.sms.api_url.is_empty()
        {
            return Err(AppError::configuration(
                "channels.sms.api_url is required for the http transport",
            ));
        }
        Ok(())
    }
}

fn default_database_url() -> String {
    "postgres://localhost:5432/warranty_keeper".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_true() -> bool {
    true
}
