//! Health check port - backend reachability.

use async_trait::async_trait;

use super::ApiError;

/// Port for probing whether the backend is reachable.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Issues one reachability request. Any success status counts as healthy.
    async fn check_health(&self) -> Result<(), ApiError>;
}
