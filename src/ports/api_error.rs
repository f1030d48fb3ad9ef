//! Errors shared by every backend port.

use std::time::Duration;

/// Failure talking to the statistics/assistant backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, reset, and similar transport errors.
    #[error("network error: {0}")]
    Network(String),

    /// The transport timeout elapsed.
    #[error("request timed out{}", describe_timeout(.timeout_ms))]
    Timeout {
        /// Timeout in milliseconds, when one was configured.
        timeout_ms: Option<u64>,
    },

    /// The backend answered with a non-success status.
    #[error("HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates a timeout error for an optionally configured limit.
    pub fn timeout(limit: Option<Duration>) -> Self {
        Self::Timeout {
            timeout_ms: limit.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    /// Creates a status error.
    pub fn status(status: u16) -> Self {
        Self::Status { status }
    }

    /// Returns true if repeating the request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout { .. } => true,
            ApiError::Status { status } => matches!(status, 408 | 429 | 500..=599),
            ApiError::Decode(_) => false,
        }
    }
}

fn describe_timeout(timeout_ms: &Option<u64>) -> String {
    timeout_ms
        .map(|ms| format!(" after {}ms", ms))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_correctly() {
        assert_eq!(ApiError::network("Timeout").to_string(), "network error: Timeout");
        assert_eq!(ApiError::status(503).to_string(), "HTTP 503");
        assert_eq!(
            ApiError::timeout(Some(Duration::from_secs(30))).to_string(),
            "request timed out after 30000ms"
        );
        assert_eq!(
            ApiError::decode("expected array").to_string(),
            "invalid response body: expected array"
        );
    }

    #[test]
    fn timeout_reports_sub_second_limits_and_omits_unknown_ones() {
        assert_eq!(
            ApiError::timeout(Some(Duration::from_millis(250))).to_string(),
            "request timed out after 250ms"
        );
        assert_eq!(ApiError::timeout(None).to_string(), "request timed out");
    }

    #[test]
    fn transient_classification() {
        assert!(ApiError::network("reset").is_transient());
        assert!(ApiError::timeout(None).is_transient());
        assert!(ApiError::status(503).is_transient());
        assert!(ApiError::status(429).is_transient());

        assert!(!ApiError::status(404).is_transient());
        assert!(!ApiError::decode("bad").is_transient());
    }
}
