//! Chart-ready views derived from the raw records.
//!
//! All builders are pure functions of their input. Records whose port code is
//! not one of the five tracked ports are left out of per-port views.

use serde::Serialize;
use std::collections::BTreeMap;

use super::port::{PortCode, PortInfo};
use super::records::{ComparisonRecord, SummaryRecord, TrendRecord};

/// Years shown as heatmap columns.
pub const HEATMAP_YEARS: [i32; 5] = [2020, 2021, 2022, 2023, 2024];

/// One port's latest-year position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub port_code: PortCode,
    /// `total_tonnage_mt / 1_000_000`
    pub tonnage_millions: f64,
    pub market_share_pct: f64,
    /// Zero when the backend has no container figure for the port.
    pub teu: f64,
}

impl ComparisonView {
    /// Normalizes one record; `None` when the port code is unknown.
    pub fn from_record(record: &ComparisonRecord) -> Option<Self> {
        let port_code = known_port(&record.port_code)?;
        Some(Self {
            port_code,
            tonnage_millions: record.total_tonnage_mt.millions(),
            market_share_pct: record.tonnage_market_share_pct.value(),
            teu: record.total_teus.value(),
        })
    }
}

/// One port's totals for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub port_code: PortCode,
    pub year: i32,
    pub tonnage_millions: f64,
    pub teu: f64,
}

impl SummaryView {
    pub fn from_record(record: &SummaryRecord) -> Option<Self> {
        let port_code = known_port(&record.port_code)?;
        Some(Self {
            port_code,
            year: record.year,
            tonnage_millions: record.total_tonnage_mt.millions(),
            teu: record.total_teus.value(),
        })
    }
}

/// Tonnage of every reporting port for a single year.
///
/// Serializes flat (`{"year": 2022, "PAC": 11.2, "LOME": 30.1}`), the shape a
/// line or area chart consumes directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTonnage {
    pub year: i32,
    #[serde(flatten)]
    pub tonnage_millions: BTreeMap<PortCode, f64>,
}

/// Trend records grouped by year, then by port, ascending by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct YearlyPivot {
    points: Vec<YearTonnage>,
}

impl YearlyPivot {
    /// Groups trend records by year then port.
    ///
    /// Every year in the input appears in the output, even when none of its
    /// records belong to a tracked port. For duplicate (port, year) pairs the
    /// first record wins, matching the record [`Heatmap`] picks, so both
    /// views show the same figure for a cell.
    pub fn from_trends(trends: &[TrendRecord]) -> Self {
        let mut by_year: BTreeMap<i32, BTreeMap<PortCode, f64>> = BTreeMap::new();
        for record in trends {
            let ports = by_year.entry(record.year).or_default();
            match known_port(&record.port_code) {
                Some(port) => {
                    ports
                        .entry(port)
                        .or_insert_with(|| record.total_tonnage_mt.millions());
                }
                None => tracing::debug!(
                    port_code = %record.port_code,
                    year = record.year,
                    "Skipping trend record for untracked port"
                ),
            }
        }

        let points = by_year
            .into_iter()
            .map(|(year, tonnage_millions)| YearTonnage {
                year,
                tonnage_millions,
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[YearTonnage] {
        &self.points
    }

    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.year).collect()
    }

    /// Tonnage in millions for a port and year, if reported.
    pub fn get(&self, year: i32, port: PortCode) -> Option<f64> {
        self.points
            .binary_search_by_key(&year, |p| p.year)
            .ok()
            .and_then(|idx| self.points[idx].tonnage_millions.get(&port).copied())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub year: i32,
    /// Tonnage in millions, zero when the port has no record for the year.
    pub value: f64,
    /// `value / column max`, in `[0, 1]`.
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub port: PortCode,
    pub cells: Vec<HeatmapCell>,
}

/// Port × year grid over [`HEATMAP_YEARS`], scaled per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heatmap {
    pub years: Vec<i32>,
    /// Largest value in each column, same order as `years`.
    pub column_max: Vec<f64>,
    /// One row per port, in [`PortCode::ALL`] order.
    pub rows: Vec<HeatmapRow>,
}

impl Heatmap {
    pub fn from_trends(trends: &[TrendRecord]) -> Self {
        let values: Vec<[f64; HEATMAP_YEARS.len()]> = PortCode::ALL
            .iter()
            .map(|port| {
                let mut row = [0.0; HEATMAP_YEARS.len()];
                for (slot, year) in row.iter_mut().zip(HEATMAP_YEARS) {
                    *slot = lookup_tonnage(trends, *port, year);
                }
                row
            })
            .collect();

        let column_max: Vec<f64> = (0..HEATMAP_YEARS.len())
            .map(|col| values.iter().map(|row| row[col]).fold(0.0, f64::max))
            .collect();

        let rows = PortCode::ALL
            .iter()
            .zip(&values)
            .map(|(port, row)| HeatmapRow {
                port: *port,
                cells: HEATMAP_YEARS
                    .iter()
                    .zip(row)
                    .zip(&column_max)
                    .map(|((year, value), max)| HeatmapCell {
                        year: *year,
                        value: *value,
                        intensity: intensity(*value, *max),
                    })
                    .collect(),
            })
            .collect();

        Self {
            years: HEATMAP_YEARS.to_vec(),
            column_max,
            rows,
        }
    }

    pub fn row(&self, port: PortCode) -> &HeatmapRow {
        &self.rows[port.index()]
    }

    pub fn cell(&self, port: PortCode, year: i32) -> Option<&HeatmapCell> {
        self.row(port).cells.iter().find(|c| c.year == year)
    }
}

impl Default for Heatmap {
    fn default() -> Self {
        Self::from_trends(&[])
    }
}

/// Display intensity of a cell relative to its column maximum.
pub fn intensity(value: f64, column_max: f64) -> f64 {
    if column_max > 0.0 {
        (value / column_max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Headline figures for one port; `None` where the comparison has no row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortKpi {
    pub port: PortInfo,
    pub tonnage_millions: Option<f64>,
    pub market_share_pct: Option<f64>,
}

/// One KPI per tracked port, in [`PortCode::ALL`] order.
pub fn build_kpis(comparison: &[ComparisonView]) -> Vec<PortKpi> {
    PortCode::ALL
        .iter()
        .map(|port| {
            let row = comparison.iter().find(|c| c.port_code == *port);
            PortKpi {
                port: port.info(),
                tonnage_millions: row.map(|r| r.tonnage_millions),
                market_share_pct: row.map(|r| r.market_share_pct),
            }
        })
        .collect()
}

pub fn build_comparison(records: &[ComparisonRecord]) -> Vec<ComparisonView> {
    records.iter().filter_map(ComparisonView::from_record).collect()
}

pub fn build_summary(records: &[SummaryRecord]) -> Vec<SummaryView> {
    records.iter().filter_map(SummaryView::from_record).collect()
}

fn lookup_tonnage(trends: &[TrendRecord], port: PortCode, year: i32) -> f64 {
    trends
        .iter()
        .find(|t| t.year == year && known_port(&t.port_code) == Some(port))
        .map(|t| t.total_tonnage_mt.millions())
        .unwrap_or(0.0)
}

fn known_port(code: &str) -> Option<PortCode> {
    code.parse().ok()
}

#[cfg(test)]
#[path = "views_test.rs"]
mod views_test;
