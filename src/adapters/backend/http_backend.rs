//! HTTP backend - reqwest implementation of every backend port.
//!
//! Talks JSON to the statistics service under a configurable base URL
//! (default `http://localhost:5000/api`).
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpBackendConfig::new("http://localhost:5000/api")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let backend = HttpBackend::new(config)?;
//! let trends = backend.fetch_trends().await?;
//! ```
//!
//! No request is retried here. Without a configured timeout the transport
//! default applies.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::statistics::{ComparisonRecord, SummaryRecord, TrendRecord};
use crate::ports::{ApiError, ChatAssistant, HealthCheck, StatisticsSource};

/// Backend endpoints, relative to the base URL.
pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const SUMMARY: &str = "/ports/summary";
    pub const COMPARISON: &str = "/ports/comparison";
    pub const TRENDS: &str = "/ports/trends";
    pub const INSIGHTS: &str = "/groq/insights";
    pub const CHAT: &str = "/groq/chat";
}

/// Configuration for the HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL including the `/api` prefix.
    pub base_url: String,
    /// Per-request timeout; `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl HttpBackendConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// reqwest-backed client for the statistics service.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: HttpBackendConfig,
    client: Client,
}

impl HttpBackend {
    /// Creates a backend client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the TLS/transport layer cannot be
    /// initialised.
    pub fn new(config: HttpBackendConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Joins the base URL and an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Maps a transport error onto the port's error type.
    fn map_transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::timeout(self.config.timeout)
        } else if err.is_connect() {
            ApiError::network(format!("Connection failed: {}", err))
        } else {
            ApiError::network(err.to_string())
        }
    }

    /// Rejects non-success statuses.
    fn check_status(path: &str, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            tracing::debug!(endpoint = path, status = status.as_u16(), "Backend returned error status");
            Err(ApiError::status(status.as_u16()))
        }
    }

    /// Reads and decodes a JSON body.
    async fn decode<T: DeserializeOwned>(&self, path: &str, response: Response) -> Result<T, ApiError> {
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::decode(format!("{}: {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(endpoint = path, "GET");
        let response = self
            .client
            .get(self.endpoint_url(path))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let response = Self::check_status(path, response)?;
        self.decode(path, response).await
    }
}

#[async_trait]
impl HealthCheck for HttpBackend {
    async fn check_health(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .get(self.endpoint_url(endpoints::HEALTH))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        Self::check_status(endpoints::HEALTH, response).map(|_| ())
    }
}

#[async_trait]
impl StatisticsSource for HttpBackend {
    async fn fetch_summary(&self) -> Result<Vec<SummaryRecord>, ApiError> {
        self.get_json(endpoints::SUMMARY).await
    }

    async fn fetch_comparison(&self) -> Result<Vec<ComparisonRecord>, ApiError> {
        self.get_json(endpoints::COMPARISON).await
    }

    async fn fetch_trends(&self) -> Result<Vec<TrendRecord>, ApiError> {
        self.get_json(endpoints::TRENDS).await
    }

    async fn fetch_insights(&self) -> Result<Vec<String>, ApiError> {
        let body: InsightsResponse = self.get_json(endpoints::INSIGHTS).await?;
        Ok(body.into_insights())
    }
}

#[async_trait]
impl ChatAssistant for HttpBackend {
    async fn ask(&self, message: &str) -> Result<String, ApiError> {
        tracing::debug!(endpoint = endpoints::CHAT, chars = message.chars().count(), "POST");
        let response = self
            .client
            .post(self.endpoint_url(endpoints::CHAT))
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let response = Self::check_status(endpoints::CHAT, response)?;
        let body: ChatResponse = self.decode(endpoints::CHAT, response).await?;
        Ok(body.into_reply())
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    response: Option<String>,
}

impl ChatResponse {
    fn into_reply(self) -> String {
        self.response.unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
struct InsightsResponse {
    #[serde(default)]
    insights: Option<Vec<String>>,
}

impl InsightsResponse {
    fn into_insights(self) -> Vec<String> {
        self.insights.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base_url: &str) -> HttpBackend {
        HttpBackend::new(HttpBackendConfig::new(base_url)).unwrap()
    }

    #[test]
    fn config_builder_works() {
        let config = HttpBackendConfig::new("http://ports.local/api")
            .with_timeout(Duration::from_secs(10));
        assert_eq!(config.base_url, "http://ports.local/api");
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn config_defaults_to_transport_timeout() {
        assert_eq!(HttpBackendConfig::new("http://x/api").timeout, None);
    }

    #[test]
    fn endpoint_url_joins_paths() {
        let backend = backend("http://localhost:5000/api");
        assert_eq!(
            backend.endpoint_url(endpoints::TRENDS),
            "http://localhost:5000/api/ports/trends"
        );
    }

    #[test]
    fn endpoint_url_tolerates_trailing_slash() {
        let backend = backend("http://localhost:5000/api/");
        assert_eq!(
            backend.endpoint_url(endpoints::HEALTH),
            "http://localhost:5000/api/health"
        );
    }

    #[test]
    fn chat_request_serializes_message_field() {
        let json = serde_json::to_string(&ChatRequest { message: "Compare ports" }).unwrap();
        assert_eq!(json, r#"{"message":"Compare ports"}"#);
    }

    #[test]
    fn chat_response_missing_or_null_reply_is_empty() {
        let body: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.into_reply(), "");

        let body: ChatResponse = serde_json::from_str(r#"{"response": null}"#).unwrap();
        assert_eq!(body.into_reply(), "");

        let body: ChatResponse = serde_json::from_str(r#"{"response": "LOME leads"}"#).unwrap();
        assert_eq!(body.into_reply(), "LOME leads");
    }

    #[test]
    fn insights_response_missing_key_is_empty() {
        let body: InsightsResponse = serde_json::from_str("{}").unwrap();
        assert!(body.into_insights().is_empty());

        let body: InsightsResponse =
            serde_json::from_str(r#"{"insights": ["a", "b"]}"#).unwrap();
        assert_eq!(body.into_insights(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let backend = backend("http://127.0.0.1:9/api");
        let err = backend.check_health().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "unexpected error: {:?}", err);
    }
}
