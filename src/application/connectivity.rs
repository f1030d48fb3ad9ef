//! Connectivity gate - one reachability probe per application load.
//!
//! The gate settles the process-wide readiness state exactly once:
//!
//! ```text
//! Checking ──▶ Connected
//!     └──────▶ Unreachable { reason }
//! ```
//!
//! Later calls to [`ConnectivityGate::probe`] return the recorded outcome
//! without touching the network. Concurrent callers share the single probe.
//!
//! # Configuration
//!
//! | Field | Default | Description |
//! |-------|---------|-------------|
//! | `max_attempts` | 1 | Probe attempts before giving up |
//! | `retry_delay` | 500ms | Pause between attempts |
//!
//! Only transient failures (transport errors, 408/429/5xx) are retried.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, OnceCell};

use crate::domain::foundation::StateMachine;
use crate::ports::{ApiError, HealthCheck};

/// Shown while the backend cannot be reached.
pub const REMEDIATION_HINT: &str =
    "Start the statistics backend (python dashboard/api.py, port 5000) and reload the dashboard.";

/// Process-wide readiness of the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ConnectivityStatus {
    Checking,
    Connected,
    Unreachable { reason: String },
}

impl ConnectivityStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// True once the probe has produced an outcome.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Checking)
    }

    /// Guidance for the fallback view, only while unreachable.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::Unreachable { .. } => Some(REMEDIATION_HINT),
            _ => None,
        }
    }
}

impl Default for ConnectivityStatus {
    fn default() -> Self {
        Self::Checking
    }
}

/// Readiness phase without the failure detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Checking,
    Connected,
    Unreachable,
}

impl From<&ConnectivityStatus> for Phase {
    fn from(status: &ConnectivityStatus) -> Self {
        match status {
            ConnectivityStatus::Checking => Phase::Checking,
            ConnectivityStatus::Connected => Phase::Connected,
            ConnectivityStatus::Unreachable { .. } => Phase::Unreachable,
        }
    }
}

impl StateMachine for Phase {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (Phase::Checking, Phase::Connected) | (Phase::Checking, Phase::Unreachable)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Phase::Checking => vec![Phase::Connected, Phase::Unreachable],
            Phase::Connected | Phase::Unreachable => vec![],
        }
    }
}

/// How the gate probes the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl ProbePolicy {
    /// Single probe, no retry.
    pub fn single_shot() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

/// Probes backend reachability once and publishes the outcome.
pub struct ConnectivityGate {
    health: Arc<dyn HealthCheck>,
    policy: ProbePolicy,
    status: watch::Sender<ConnectivityStatus>,
    outcome: OnceCell<Result<(), ApiError>>,
}

impl ConnectivityGate {
    pub fn new(health: Arc<dyn HealthCheck>, policy: ProbePolicy) -> Self {
        let (status, _) = watch::channel(ConnectivityStatus::Checking);
        Self {
            health,
            policy,
            status,
            outcome: OnceCell::new(),
        }
    }

    /// Probes the backend, or returns the recorded outcome.
    pub async fn probe(&self) -> Result<(), ApiError> {
        self.outcome
            .get_or_init(|| async {
                let outcome = self.probe_with_policy().await;
                self.settle(&outcome);
                outcome
            })
            .await
            .clone()
    }

    /// Current readiness state.
    pub fn status(&self) -> ConnectivityStatus {
        self.status.borrow().clone()
    }

    /// Subscribes to readiness changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityStatus> {
        self.status.subscribe()
    }

    async fn probe_with_policy(&self) -> Result<(), ApiError> {
        let mut attempt = 1;
        loop {
            match self.health.check_health().await {
                Ok(()) => return Ok(()),
                Err(err) if err.is_transient() && attempt < self.policy.max_attempts => {
                    tracing::debug!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %err,
                        "Health probe failed, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(self.policy.retry_delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn settle(&self, outcome: &Result<(), ApiError>) {
        let next = match outcome {
            Ok(()) => {
                tracing::info!("Backend reachable");
                ConnectivityStatus::Connected
            }
            Err(err) => {
                tracing::warn!(error = %err, "Backend unreachable");
                ConnectivityStatus::Unreachable {
                    reason: err.to_string(),
                }
            }
        };

        let current = Phase::from(&*self.status.borrow());
        match current.transition_to(Phase::from(&next)) {
            Ok(_) => {
                self.status.send_replace(next);
            }
            Err(err) => tracing::error!(error = %err, "Readiness already settled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockBackend;

    fn gate(backend: &MockBackend, policy: ProbePolicy) -> ConnectivityGate {
        ConnectivityGate::new(Arc::new(backend.clone()), policy)
    }

    mod status {
        use super::*;

        #[test]
        fn starts_checking() {
            let status = ConnectivityStatus::default();
            assert!(!status.is_settled());
            assert!(!status.is_connected());
            assert_eq!(status.remediation(), None);
        }

        #[test]
        fn unreachable_offers_remediation() {
            let status = ConnectivityStatus::Unreachable {
                reason: "HTTP 503".to_string(),
            };
            assert!(status.is_settled());
            assert_eq!(status.remediation(), Some(REMEDIATION_HINT));
        }

        #[test]
        fn serializes_with_status_tag() {
            let json = serde_json::to_value(ConnectivityStatus::Unreachable {
                reason: "HTTP 500".to_string(),
            })
            .unwrap();
            assert_eq!(json["status"], "unreachable");
            assert_eq!(json["reason"], "HTTP 500");
        }

        #[test]
        fn phases_settle_once() {
            assert!(Phase::Checking.can_transition_to(&Phase::Connected));
            assert!(Phase::Checking.can_transition_to(&Phase::Unreachable));
            assert!(Phase::Connected.is_terminal());
            assert!(Phase::Unreachable.is_terminal());
            assert!(Phase::Connected.transition_to(Phase::Unreachable).is_err());
        }
    }

    mod probe {
        use super::*;

        #[tokio::test]
        async fn connected_when_health_succeeds() {
            let backend = MockBackend::new();
            let gate = gate(&backend, ProbePolicy::default());

            assert!(gate.probe().await.is_ok());
            assert_eq!(gate.status(), ConnectivityStatus::Connected);
        }

        #[tokio::test]
        async fn unreachable_when_health_fails() {
            let backend = MockBackend::new().unreachable(ApiError::status(503));
            let gate = gate(&backend, ProbePolicy::default());

            assert_eq!(gate.probe().await, Err(ApiError::status(503)));
            assert_eq!(
                gate.status(),
                ConnectivityStatus::Unreachable {
                    reason: "HTTP 503".to_string()
                }
            );
        }

        #[tokio::test]
        async fn probes_network_at_most_once() {
            let backend = MockBackend::new().with_health(Err(ApiError::network("refused")));
            let gate = gate(&backend, ProbePolicy::default());

            let first = gate.probe().await;
            let second = gate.probe().await;

            assert!(first.is_err());
            assert_eq!(first, second);
            assert_eq!(backend.calls().health, 1);
        }

        #[tokio::test(start_paused = true)]
        async fn concurrent_probes_share_one_request() {
            let backend = MockBackend::new().with_health_delay(Duration::from_millis(200));
            let gate = gate(&backend, ProbePolicy::default());

            let (a, b) = tokio::join!(gate.probe(), gate.probe());

            assert!(a.is_ok() && b.is_ok());
            assert_eq!(backend.calls().health, 1);
        }

        #[tokio::test]
        async fn subscribers_see_the_outcome() {
            let backend = MockBackend::new();
            let gate = gate(&backend, ProbePolicy::default());
            let mut rx = gate.subscribe();
            assert_eq!(*rx.borrow(), ConnectivityStatus::Checking);

            gate.probe().await.unwrap();

            rx.changed().await.unwrap();
            assert!(rx.borrow().is_connected());
        }
    }

    mod policy {
        use super::*;

        #[test]
        fn default_is_single_shot() {
            let policy = ProbePolicy::default();
            assert_eq!(policy.max_attempts, 1);
            assert_eq!(policy.retry_delay, Duration::from_millis(500));
            assert_eq!(ProbePolicy::single_shot(), policy);
        }

        #[test]
        fn attempts_are_at_least_one() {
            assert_eq!(ProbePolicy::default().with_max_attempts(0).max_attempts, 1);
        }

        #[tokio::test(start_paused = true)]
        async fn retries_transient_failures() {
            let backend = MockBackend::new()
                .with_health(Err(ApiError::network("refused")))
                .with_health(Err(ApiError::status(502)));
            let gate = gate(
                &backend,
                ProbePolicy::default()
                    .with_max_attempts(3)
                    .with_retry_delay(Duration::from_millis(100)),
            );

            assert!(gate.probe().await.is_ok());
            assert_eq!(backend.calls().health, 3);
        }

        #[tokio::test(start_paused = true)]
        async fn does_not_retry_permanent_failures() {
            let backend = MockBackend::new().unreachable(ApiError::status(404));
            let gate = gate(&backend, ProbePolicy::default().with_max_attempts(3));

            assert_eq!(gate.probe().await, Err(ApiError::status(404)));
            assert_eq!(backend.calls().health, 1);
        }

        #[tokio::test(start_paused = true)]
        async fn gives_up_after_max_attempts() {
            let backend = MockBackend::new().unreachable(ApiError::network("refused"));
            let gate = gate(&backend, ProbePolicy::default().with_max_attempts(2));

            assert!(gate.probe().await.is_err());
            assert_eq!(backend.calls().health, 2);
        }
    }
}
