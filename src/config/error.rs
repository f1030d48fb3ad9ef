//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Backend base URL must start with http:// or https://")]
    InvalidBaseUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Probe attempts must be at least 1")]
    InvalidProbeAttempts,

    #[error("Reveal interval must be between 1 and 1000 ms")]
    InvalidRevealInterval,

    #[error("Chat queue capacity must be at least 1")]
    InvalidQueueCapacity,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
