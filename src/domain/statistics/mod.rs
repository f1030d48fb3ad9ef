//! Statistics domain module.
//!
//! Reference data for the five tracked ports, the lenient numeric
//! normalizer, the raw backend records, and the chart-ready views derived
//! from them.

mod dataset;
mod numeric;
mod port;
mod records;
mod views;

pub use dataset::DashboardDataset;
pub use numeric::{normalize, parse_lenient, LooseNumber};
pub use port::{PortCode, PortInfo};
pub use records::{ComparisonRecord, RawDataset, SummaryRecord, TrendRecord};
pub use views::{
    build_comparison, build_kpis, build_summary, intensity, ComparisonView, Heatmap, HeatmapCell,
    HeatmapRow, PortKpi, SummaryView, YearTonnage, YearlyPivot, HEATMAP_YEARS,
};
