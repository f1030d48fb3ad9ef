//! Statistics source port - the four dashboard collections.
//!
//! Each method issues exactly one request and returns the decoded records.
//! Implementations do not retry; retry policy, if any, belongs to callers.

use async_trait::async_trait;

use super::ApiError;
use crate::domain::statistics::{ComparisonRecord, SummaryRecord, TrendRecord};

/// Port for reading port statistics from the backend.
#[async_trait]
pub trait StatisticsSource: Send + Sync {
    /// Annual totals per port (`GET /ports/summary`).
    async fn fetch_summary(&self) -> Result<Vec<SummaryRecord>, ApiError>;

    /// Latest-year comparison per port (`GET /ports/comparison`).
    async fn fetch_comparison(&self) -> Result<Vec<ComparisonRecord>, ApiError>;

    /// Tonnage per (port, year) (`GET /ports/trends`).
    async fn fetch_trends(&self) -> Result<Vec<TrendRecord>, ApiError>;

    /// Generated insight sentences (`GET /groq/insights`).
    async fn fetch_insights(&self) -> Result<Vec<String>, ApiError>;
}
