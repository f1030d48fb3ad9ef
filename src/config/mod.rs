//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `WA_PORTS` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment yields a working
//! configuration pointing at `http://localhost:5000/api`.
//!
//! # Example
//!
//! ```no_run
//! use wa_ports_dashboard::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend at {}", config.api.base_url);
//! ```

mod api;
mod chat;
mod error;
mod logging;

pub use api::ApiConfig;
pub use chat::ChatConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Statistics backend (base URL, timeout, probe policy)
    #[serde(default)]
    pub api: ApiConfig,

    /// Chat session (reveal cadence, busy policy)
    #[serde(default)]
    pub chat: ChatConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `WA_PORTS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `WA_PORTS__API__BASE_URL=http://stats:5000/api` -> `api.base_url`
    /// - `WA_PORTS__CHAT__BUSY_POLICY=queue` -> `chat.busy_policy`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WA_PORTS")
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
        self.api.validate()?;
        self.chat.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::BusyPolicy;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "WA_PORTS__API__BASE_URL",
        "WA_PORTS__API__TIMEOUT_SECS",
        "WA_PORTS__API__PROBE_ATTEMPTS",
        "WA_PORTS__CHAT__REVEAL_INTERVAL_MS",
        "WA_PORTS__CHAT__BUSY_POLICY",
        "WA_PORTS__CHAT__QUEUE_CAPACITY",
        "WA_PORTS__LOGGING__FORMAT",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.chat.reveal_interval_ms, 15);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("WA_PORTS__API__BASE_URL", "https://stats.example.org/api");
        env::set_var("WA_PORTS__API__TIMEOUT_SECS", "12");
        env::set_var("WA_PORTS__API__PROBE_ATTEMPTS", "3");
        env::set_var("WA_PORTS__CHAT__BUSY_POLICY", "queue");
        env::set_var("WA_PORTS__CHAT__QUEUE_CAPACITY", "4");
        env::set_var("WA_PORTS__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.api.base_url, "https://stats.example.org/api");
        assert_eq!(config.api.timeout_secs, Some(12));
        assert_eq!(config.api.probe_attempts, 3);
        assert_eq!(config.chat.busy_policy, BusyPolicy::Queue);
        assert_eq!(config.chat.queue_capacity, 4);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validate_rejects_bad_reveal_interval() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("WA_PORTS__CHAT__REVEAL_INTERVAL_MS", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidRevealInterval)
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
