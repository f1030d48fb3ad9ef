//! Backend API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::HttpBackendConfig;
use crate::application::ProbePolicy;

/// Statistics backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the JSON API, including the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds; unset keeps the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Health probe attempts before the backend is declared unreachable
    #[serde(default = "default_probe_attempts")]
    pub probe_attempts: u32,

    /// Pause between health probe attempts in milliseconds
    #[serde(default = "default_probe_retry_delay")]
    pub probe_retry_delay_ms: u64,
}

impl ApiConfig {
    /// HTTP adapter settings
    pub fn backend_config(&self) -> HttpBackendConfig {
        let config = HttpBackendConfig::new(self.base_url.clone());
        match self.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    /// Connectivity gate probe policy
    pub fn probe_policy(&self) -> ProbePolicy {
        ProbePolicy::default()
            .with_max_attempts(self.probe_attempts)
            .with_retry_delay(Duration::from_millis(self.probe_retry_delay_ms))
    }

    /// Validate backend configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.probe_attempts == 0 {
            return Err(ValidationError::InvalidProbeAttempts);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            probe_attempts: default_probe_attempts(),
            probe_retry_delay_ms: default_probe_retry_delay(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_probe_attempts() -> u32 {
    1
}

fn default_probe_retry_delay() -> u64 {
    500
}
