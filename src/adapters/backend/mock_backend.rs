//! Mock backend for testing.
//!
//! Implements every backend port in memory so the application layer can be
//! exercised without a running statistics service.
//!
//! # Features
//!
//! - Canned collections per endpoint, or an injected error
//! - Queued chat replies consumed in order
//! - Simulated latency (works with a paused tokio clock)
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let backend = MockBackend::new()
//!     .with_trends(vec![trend])
//!     .with_reply("LOME handled the most tonnage.")
//!     .with_chat_delay(Duration::from_millis(200));
//!
//! let reply = backend.ask("Which port is biggest?").await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::statistics::{ComparisonRecord, SummaryRecord, TrendRecord};
use crate::ports::{ApiError, ChatAssistant, HealthCheck, StatisticsSource};

/// Reply used once the configured chat queue is exhausted.
pub const DEFAULT_MOCK_REPLY: &str = "Mock reply";

/// A configured chat outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Answer with this text (empty means "no reply").
    Reply(String),
    /// Fail the request.
    Error(ApiError),
}

/// Calls recorded by a [`MockBackend`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockCalls {
    pub health: usize,
    pub summary: usize,
    pub comparison: usize,
    pub trends: usize,
    pub insights: usize,
    /// Chat messages in the order they were asked.
    pub chat: Vec<String>,
}

#[derive(Debug)]
struct MockState {
    health: VecDeque<Result<(), ApiError>>,
    summary: Result<Vec<SummaryRecord>, ApiError>,
    comparison: Result<Vec<ComparisonRecord>, ApiError>,
    trends: Result<Vec<TrendRecord>, ApiError>,
    insights: Result<Vec<String>, ApiError>,
    replies: VecDeque<MockReply>,
    calls: MockCalls,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            health: VecDeque::new(),
            summary: Ok(Vec::new()),
            comparison: Ok(Vec::new()),
            trends: Ok(Vec::new()),
            insights: Ok(Vec::new()),
            replies: VecDeque::new(),
            calls: MockCalls::default(),
        }
    }
}

/// In-memory backend implementing [`HealthCheck`], [`StatisticsSource`]
/// and [`ChatAssistant`].
///
/// Clones share state, so a test can keep a handle for assertions after
/// moving one into the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
    health_delay: Duration,
    statistics_delay: Duration,
    chat_delay: Duration,
}

impl MockBackend {
    /// Creates a healthy backend with empty collections.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn configure(self, f: impl FnOnce(&mut MockState)) -> Self {
        f(&mut self.state());
        self
    }

    /// Queues one health probe outcome. Once the queue is empty probes succeed.
    pub fn with_health(self, result: Result<(), ApiError>) -> Self {
        self.configure(|s| s.health.push_back(result))
    }

    /// Makes every health probe fail with `error`.
    pub fn unreachable(self, error: ApiError) -> Self {
        // Enough failures to outlast any probe policy used in tests.
        self.configure(|s| s.health = std::iter::repeat(Err(error)).take(64).collect())
    }

    pub fn with_summary(self, records: Vec<SummaryRecord>) -> Self {
        self.configure(|s| s.summary = Ok(records))
    }

    pub fn with_summary_error(self, error: ApiError) -> Self {
        self.configure(|s| s.summary = Err(error))
    }

    pub fn with_comparison(self, records: Vec<ComparisonRecord>) -> Self {
        self.configure(|s| s.comparison = Ok(records))
    }

    pub fn with_comparison_error(self, error: ApiError) -> Self {
        self.configure(|s| s.comparison = Err(error))
    }

    pub fn with_trends(self, records: Vec<TrendRecord>) -> Self {
        self.configure(|s| s.trends = Ok(records))
    }

    pub fn with_trends_error(self, error: ApiError) -> Self {
        self.configure(|s| s.trends = Err(error))
    }

    pub fn with_insights(self, insights: Vec<String>) -> Self {
        self.configure(|s| s.insights = Ok(insights))
    }

    pub fn with_insights_error(self, error: ApiError) -> Self {
        self.configure(|s| s.insights = Err(error))
    }

    /// Queues a chat reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        let reply = MockReply::Reply(content.into());
        self.configure(|s| s.replies.push_back(reply))
    }

    /// Queues a chat failure.
    pub fn with_chat_error(self, error: ApiError) -> Self {
        self.configure(|s| s.replies.push_back(MockReply::Error(error)))
    }

    /// Latency of each health probe.
    pub fn with_health_delay(mut self, delay: Duration) -> Self {
        self.health_delay = delay;
        self
    }

    /// Latency of each statistics fetch.
    pub fn with_statistics_delay(mut self, delay: Duration) -> Self {
        self.statistics_delay = delay;
        self
    }

    /// Latency of each chat request.
    pub fn with_chat_delay(mut self, delay: Duration) -> Self {
        self.chat_delay = delay;
        self
    }

    /// Replaces the summary outcome on a shared handle.
    pub fn set_summary(&self, outcome: Result<Vec<SummaryRecord>, ApiError>) {
        self.state().summary = outcome;
    }

    /// Replaces the trend collection on a shared handle.
    pub fn set_trends(&self, records: Vec<TrendRecord>) {
        self.state().trends = Ok(records);
    }

    /// Replaces the insights outcome on a shared handle.
    pub fn set_insights(&self, outcome: Result<Vec<String>, ApiError>) {
        self.state().insights = outcome;
    }

    /// Snapshot of recorded calls.
    pub fn calls(&self) -> MockCalls {
        self.state().calls.clone()
    }

    /// Total statistics fetches across the four endpoints.
    pub fn statistics_call_count(&self) -> usize {
        let calls = &self.state().calls;
        calls.summary + calls.comparison + calls.trends + calls.insights
    }

    pub fn clear_calls(&self) {
        self.state().calls = MockCalls::default();
    }

    async fn simulate_latency(delay: Duration) {
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}

#[async_trait]
impl HealthCheck for MockBackend {
    async fn check_health(&self) -> Result<(), ApiError> {
        let outcome = {
            let mut state = self.state();
            state.calls.health += 1;
            state.health.pop_front().unwrap_or(Ok(()))
        };
        Self::simulate_latency(self.health_delay).await;
        outcome
    }
}

#[async_trait]
impl StatisticsSource for MockBackend {
    async fn fetch_summary(&self) -> Result<Vec<SummaryRecord>, ApiError> {
        let outcome = {
            let mut state = self.state();
            state.calls.summary += 1;
            state.summary.clone()
        };
        Self::simulate_latency(self.statistics_delay).await;
        outcome
    }

    async fn fetch_comparison(&self) -> Result<Vec<ComparisonRecord>, ApiError> {
        let outcome = {
            let mut state = self.state();
            state.calls.comparison += 1;
            state.comparison.clone()
        };
        Self::simulate_latency(self.statistics_delay).await;
        outcome
    }

    async fn fetch_trends(&self) -> Result<Vec<TrendRecord>, ApiError> {
        let outcome = {
            let mut state = self.state();
            state.calls.trends += 1;
            state.trends.clone()
        };
        Self::simulate_latency(self.statistics_delay).await;
        outcome
    }

    async fn fetch_insights(&self) -> Result<Vec<String>, ApiError> {
        let outcome = {
            let mut state = self.state();
            state.calls.insights += 1;
            state.insights.clone()
        };
        Self::simulate_latency(self.statistics_delay).await;
        outcome
    }
}

#[async_trait]
impl ChatAssistant for MockBackend {
    async fn ask(&self, message: &str) -> Result<String, ApiError> {
        let reply = {
            let mut state = self.state();
            state.calls.chat.push(message.to_string());
            state
                .replies
                .pop_front()
                .unwrap_or_else(|| MockReply::Reply(DEFAULT_MOCK_REPLY.to_string()))
        };
        Self::simulate_latency(self.chat_delay).await;
        match reply {
            MockReply::Reply(content) => Ok(content),
            MockReply::Error(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::statistics::LooseNumber;

    fn trend(port: &str, year: i32) -> TrendRecord {
        TrendRecord {
            port_code: port.to_string(),
            year,
            total_tonnage_mt: LooseNumber::new(1.0e6),
        }
    }

    #[tokio::test]
    async fn healthy_by_default() {
        let backend = MockBackend::new();
        assert!(backend.check_health().await.is_ok());
        assert_eq!(backend.calls().health, 1);
    }

    #[tokio::test]
    async fn health_outcomes_are_consumed_in_order() {
        let backend = MockBackend::new()
            .with_health(Err(ApiError::network("refused")))
            .with_health(Ok(()));

        assert!(backend.check_health().await.is_err());
        assert!(backend.check_health().await.is_ok());
        assert!(backend.check_health().await.is_ok());
    }

    #[tokio::test]
    async fn returns_configured_collections() {
        let backend = MockBackend::new()
            .with_trends(vec![trend("PAC", 2022)])
            .with_insights(vec!["Lomé leads".to_string()]);

        assert_eq!(backend.fetch_trends().await.unwrap().len(), 1);
        assert_eq!(backend.fetch_insights().await.unwrap(), vec!["Lomé leads"]);
        assert!(backend.fetch_summary().await.unwrap().is_empty());
        assert_eq!(backend.statistics_call_count(), 3);
    }

    #[tokio::test]
    async fn injected_errors_are_returned() {
        let backend = MockBackend::new().with_comparison_error(ApiError::status(500));
        assert_eq!(
            backend.fetch_comparison().await.unwrap_err(),
            ApiError::status(500)
        );
    }

    #[tokio::test]
    async fn chat_replies_in_order_then_default() {
        let backend = MockBackend::new()
            .with_reply("First")
            .with_chat_error(ApiError::network("Timeout"));

        assert_eq!(backend.ask("a").await.unwrap(), "First");
        assert_eq!(backend.ask("b").await.unwrap_err(), ApiError::network("Timeout"));
        assert_eq!(backend.ask("c").await.unwrap(), DEFAULT_MOCK_REPLY);
        assert_eq!(backend.calls().chat, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let backend = MockBackend::new();
        let handle = backend.clone();

        backend.ask("hello").await.unwrap();
        handle.set_trends(vec![trend("TEMA", 2021)]);

        assert_eq!(handle.calls().chat, vec!["hello"]);
        assert_eq!(backend.fetch_trends().await.unwrap().len(), 1);

        handle.clear_calls();
        assert_eq!(backend.calls(), MockCalls::default());
    }

    #[tokio::test(start_paused = true)]
    async fn chat_delay_is_simulated() {
        let backend = MockBackend::new().with_chat_delay(Duration::from_secs(5));
        let start = tokio::time::Instant::now();
        backend.ask("slow").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
