//! Dataset aggregator - loads every statistics collection and publishes the
//! derived views.
//!
//! A load fetches summary, comparison, trends and insights concurrently and
//! only replaces the published [`DashboardDataset`] when all four succeed.
//! Loads are serialized; the aggregator is the only writer of the dataset.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

use super::connectivity::ConnectivityGate;
use crate::domain::foundation::Timestamp;
use crate::domain::statistics::{DashboardDataset, RawDataset};
use crate::ports::{ApiError, StatisticsSource};

/// The collections making up one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Summary,
    Comparison,
    Trends,
    Insights,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Summary => "summary",
            DatasetKind::Comparison => "comparison",
            DatasetKind::Trends => "trends",
            DatasetKind::Insights => "insights",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A load failed because one collection could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load {dataset}: {source}")]
pub struct LoadError {
    pub dataset: DatasetKind,
    pub source: ApiError,
}

impl LoadError {
    pub fn new(dataset: DatasetKind, source: ApiError) -> Self {
        Self { dataset, source }
    }
}

/// Loads the dashboard datasets and publishes the result.
pub struct DatasetAggregator {
    source: Arc<dyn StatisticsSource>,
    dataset: watch::Sender<Arc<DashboardDataset>>,
    last_error: Mutex<Option<LoadError>>,
    load_lock: tokio::sync::Mutex<()>,
    initial_load_started: AtomicBool,
}

impl DatasetAggregator {
    /// Creates an aggregator publishing the empty dataset.
    pub fn new(source: Arc<dyn StatisticsSource>) -> Self {
        let (dataset, _) = watch::channel(Arc::new(DashboardDataset::default()));
        Self {
            source,
            dataset,
            last_error: Mutex::new(None),
            load_lock: tokio::sync::Mutex::new(()),
            initial_load_started: AtomicBool::new(false),
        }
    }

    /// Fetches all four collections and replaces the published dataset.
    ///
    /// # Errors
    ///
    /// Returns the first failing collection. The published dataset is left
    /// untouched and the error is kept as [`Self::last_error`].
    pub async fn load_all(&self) -> Result<Arc<DashboardDataset>, LoadError> {
        let _guard = self.load_lock.lock().await;
        tracing::debug!("Loading dashboard datasets");

        let source = &self.source;
        let fetched = futures::try_join!(
            tagged(DatasetKind::Summary, source.fetch_summary()),
            tagged(DatasetKind::Comparison, source.fetch_comparison()),
            tagged(DatasetKind::Trends, source.fetch_trends()),
            tagged(DatasetKind::Insights, source.fetch_insights()),
        );

        match fetched {
            Ok((summary, comparison, trends, insights)) => {
                let raw = RawDataset {
                    summary,
                    comparison,
                    trends,
                    insights,
                };
                let dataset = Arc::new(DashboardDataset::from_raw(&raw, Timestamp::now()));
                tracing::info!(
                    summary = raw.summary.len(),
                    comparison = raw.comparison.len(),
                    trends = raw.trends.len(),
                    insights = raw.insights.len(),
                    "Dashboard datasets loaded"
                );

                *self.last_error_slot() = None;
                self.dataset.send_replace(Arc::clone(&dataset));
                Ok(dataset)
            }
            Err(err) => {
                tracing::warn!(
                    dataset = %err.dataset,
                    error = %err.source,
                    "Dashboard load failed, keeping previous data"
                );
                *self.last_error_slot() = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Runs the initial load once the gate reports the backend reachable.
    ///
    /// Returns `Ok(None)` when the backend is unreachable. Only the first call
    /// loads; later calls return the published dataset.
    pub async fn load_when_connected(
        &self,
        gate: &ConnectivityGate,
    ) -> Result<Option<Arc<DashboardDataset>>, LoadError> {
        if gate.probe().await.is_err() {
            tracing::debug!("Skipping dashboard load, backend unreachable");
            return Ok(None);
        }
        if self.initial_load_started.swap(true, Ordering::SeqCst) {
            return Ok(Some(self.dataset()));
        }
        self.load_all().await.map(Some)
    }

    /// The currently published dataset.
    pub fn dataset(&self) -> Arc<DashboardDataset> {
        Arc::clone(&self.dataset.borrow())
    }

    /// Subscribes to dataset replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardDataset>> {
        self.dataset.subscribe()
    }

    /// The failure of the most recent load, cleared by a successful one.
    pub fn last_error(&self) -> Option<LoadError> {
        self.last_error_slot().clone()
    }

    fn last_error_slot(&self) -> std::sync::MutexGuard<'_, Option<LoadError>> {
        self.last_error.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn tagged<T>(
    dataset: DatasetKind,
    request: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, LoadError> {
    request.await.map_err(|source| LoadError::new(dataset, source))
}
