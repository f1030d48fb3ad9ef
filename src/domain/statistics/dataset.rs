//! The aggregate dataset exposed to presentation.

use serde::Serialize;

use super::records::RawDataset;
use super::views::{
    build_comparison, build_kpis, build_summary, ComparisonView, Heatmap, PortKpi, SummaryView,
    YearlyPivot,
};
use crate::domain::foundation::Timestamp;

/// Every view the dashboard renders, built from one complete load.
///
/// The default value is the empty pre-load state: no rows, a zeroed heatmap,
/// and KPIs without figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDataset {
    pub summary: Vec<SummaryView>,
    pub comparison: Vec<ComparisonView>,
    pub yearly: YearlyPivot,
    pub heatmap: Heatmap,
    pub kpis: Vec<PortKpi>,
    pub insights: Vec<String>,
    /// When the load that produced this dataset completed.
    pub loaded_at: Option<Timestamp>,
}

impl DashboardDataset {
    /// Reshapes a complete raw load into views.
    pub fn from_raw(raw: &RawDataset, loaded_at: Timestamp) -> Self {
        let comparison = build_comparison(&raw.comparison);
        let kpis = build_kpis(&comparison);
        Self {
            summary: build_summary(&raw.summary),
            yearly: YearlyPivot::from_trends(&raw.trends),
            heatmap: Heatmap::from_trends(&raw.trends),
            comparison,
            kpis,
            insights: raw.insights.clone(),
            loaded_at: Some(loaded_at),
        }
    }

    /// True once a load has replaced the empty state.
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }
}

impl Default for DashboardDataset {
    fn default() -> Self {
        Self {
            summary: Vec::new(),
            comparison: Vec::new(),
            yearly: YearlyPivot::default(),
            heatmap: Heatmap::default(),
            kpis: build_kpis(&[]),
            insights: Vec::new(),
            loaded_at: None,
        }
    }
}
