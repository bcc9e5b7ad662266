//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PORT_LEDGER` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a working
//! in-cluster configuration.
//!
//! # Example
//!
//! ```no_run
//! use port_ledger::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod cluster;
mod error;
mod ports;
mod server;
mod storage;

pub use cluster::ClusterConfig;
pub use error::{ConfigError, ValidationError};
pub use ports::PortsConfig;
pub use server::{LogFormat, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server and logging
    #[serde(default)]
    pub server: ServerConfig,

    /// Node port range accounted for
    #[serde(default)]
    pub ports: PortsConfig,

    /// Reservation table location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cluster API access and refresh cadence
    #[serde(default)]
    pub cluster: ClusterConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PORT_LEDGER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PORT_LEDGER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PORT_LEDGER__PORTS__MIN_PORT=30000` -> `ports.min_port = 30000`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PORT_LEDGER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ports.validate()?;
        self.storage.validate()?;
        self.cluster.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "PORT_LEDGER__SERVER__PORT",
        "PORT_LEDGER__SERVER__LOG_FORMAT",
        "PORT_LEDGER__PORTS__MIN_PORT",
        "PORT_LEDGER__PORTS__MAX_PORT",
        "PORT_LEDGER__STORAGE__RESERVATIONS_FILE",
        "PORT_LEDGER__CLUSTER__ENABLED",
        "PORT_LEDGER__CLUSTER__POLL_INTERVAL_SECS",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ports.min_port, 30000);
        assert_eq!(config.ports.max_port, 32767);
        assert_eq!(config.cluster.poll_interval_secs, 10);
        assert!(config.cluster.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("PORT_LEDGER__SERVER__PORT", "3000");
        env::set_var("PORT_LEDGER__SERVER__LOG_FORMAT", "json");
        env::set_var("PORT_LEDGER__PORTS__MIN_PORT", "31000");
        env::set_var("PORT_LEDGER__PORTS__MAX_PORT", "31010");
        env::set_var("PORT_LEDGER__STORAGE__RESERVATIONS_FILE", "/tmp/r.json");
        env::set_var("PORT_LEDGER__CLUSTER__ENABLED", "false");
        env::set_var("PORT_LEDGER__CLUSTER__POLL_INTERVAL_SECS", "30");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.ports.range().unwrap().len(), 11);
        assert_eq!(
            config.storage.reservations_file,
            std::path::PathBuf::from("/tmp/r.json")
        );
        assert!(!config.cluster.enabled);
        assert_eq!(config.cluster.poll_interval_secs, 30);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("PORT_LEDGER__PORTS__MIN_PORT", "32000");
        env::set_var("PORT_LEDGER__PORTS__MAX_PORT", "31000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
