//! Raw records as returned by the statistics backend.
//!
//! Numeric fields are [`LooseNumber`]s, so a record only fails to decode when
//! its shape is wrong, never because a number is missing or malformed.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::numeric::LooseNumber;

/// Row of `GET /ports/summary`: annual totals per port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(default)]
    pub port_code: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: i32,
    #[serde(default)]
    pub total_tonnage_mt: LooseNumber,
    #[serde(default)]
    pub total_teus: LooseNumber,
}

/// Row of `GET /ports/comparison`: latest-year market position per port.
///
/// The backend also sends `year`, `teu_market_share_pct` and `tonnage_rank`;
/// none of them feed a view, so they are not decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    #[serde(default)]
    pub port_code: String,
    #[serde(default)]
    pub total_tonnage_mt: LooseNumber,
    #[serde(default)]
    pub tonnage_market_share_pct: LooseNumber,
    #[serde(default)]
    pub total_teus: LooseNumber,
}

/// Row of `GET /ports/trends`: tonnage for one (port, year) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    #[serde(default)]
    pub port_code: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: i32,
    #[serde(default)]
    pub total_tonnage_mt: LooseNumber,
}

/// The four collections fetched by one aggregate load, before reshaping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDataset {
    pub summary: Vec<SummaryRecord>,
    pub comparison: Vec<ComparisonRecord>,
    pub trends: Vec<TrendRecord>,
    pub insights: Vec<String>,
}

/// Accepts a year as an integer, an integral float, or integer text.
fn deserialize_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let year = match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    year.and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| de::Error::custom(format!("invalid year: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_record_decodes_backend_row() {
        let json = r#"{
            "port_code": "LOME",
            "year": 2024,
            "total_tonnage_mt": "31200000.00",
            "tonnage_market_share_pct": "28.4",
            "total_teus": "1900000",
            "teu_market_share_pct": "35.1",
            "tonnage_rank": 1
        }"#;
        let record: ComparisonRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.port_code, "LOME");
        assert_eq!(record.total_tonnage_mt.value(), 31_200_000.0);
        assert_eq!(record.tonnage_market_share_pct.value(), 28.4);
        assert_eq!(record.total_teus.value(), 1_900_000.0);
    }

    #[test]
    fn comparison_record_tolerates_missing_teus() {
        let json = r#"{"port_code": "PAC", "total_tonnage_mt": 12000000, "tonnage_market_share_pct": "10"}"#;
        let record: ComparisonRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.total_teus.value(), 0.0);
    }

    #[test]
    fn trend_record_accepts_textual_year() {
        let json = r#"{"port_code": "TEMA", "year": "2022", "total_tonnage_mt": "25000000"}"#;
        let record: TrendRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.year, 2022);
    }

    #[test]
    fn trend_record_accepts_integral_float_year() {
        let json = r#"{"port_code": "TEMA", "year": 2023.0, "total_tonnage_mt": 1}"#;
        let record: TrendRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.year, 2023);
    }

    #[test]
    fn trend_record_rejects_garbage_year() {
        let json = r#"{"port_code": "TEMA", "year": "soon", "total_tonnage_mt": 1}"#;
        assert!(serde_json::from_str::<TrendRecord>(json).is_err());

        let json = r#"{"port_code": "TEMA", "year": 2023.5, "total_tonnage_mt": 1}"#;
        assert!(serde_json::from_str::<TrendRecord>(json).is_err());
    }

    #[test]
    fn summary_record_decodes_numbers_and_text() {
        let json = r#"{"port_code": "ABIDJAN", "year": 2021, "total_tonnage_mt": 28000000.5, "total_teus": "bad"}"#;
        let record: SummaryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.total_tonnage_mt.value(), 28_000_000.5);
        assert_eq!(record.total_teus.value(), 0.0);
    }
}
