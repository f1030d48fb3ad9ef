//! Numeric normalizer for loosely-typed statistics fields.
//!
//! The statistics backend serializes decimals as text (`"12500000.00"`),
//! sometimes as numbers, and sometimes omits them. Every consumer wants an
//! `f64` and wants missing or garbage input to read as zero, so all numeric
//! fields of the raw records go through [`normalize`] via [`LooseNumber`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Converts a JSON value into a finite `f64`, falling back to `0.0`.
///
/// - numbers are taken as-is
/// - strings are parsed leniently with [`parse_lenient`]
/// - anything else (null, bool, array, object) is `0.0`
pub fn normalize(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_lenient(s),
        _ => 0.0,
    };
    finite_or_zero(parsed)
}

/// Parses the longest leading decimal literal of `text`.
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional exponent. Trailing garbage is ignored (`"12.5 t"` is `12.5`).
/// Text without a numeric prefix, and non-finite results, yield `0.0`.
pub fn parse_lenient(text: &str) -> f64 {
    let trimmed = text.trim();
    let end = numeric_prefix_len(trimmed.as_bytes());
    if end == 0 {
        return 0.0;
    }
    trimmed[..end]
        .parse::<f64>()
        .map(finite_or_zero)
        .unwrap_or(0.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Length in bytes of the decimal literal at the start of `bytes`, or 0.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_start = pos;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    let mut digits = pos - int_start;

    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            pos = frac_end;
        }
    }

    if digits == 0 {
        return 0;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits_start = exp;
        while bytes.get(exp).is_some_and(u8::is_ascii_digit) {
            exp += 1;
        }
        if exp > exp_digits_start {
            pos = exp;
        }
    }

    pos
}

/// A numeric field that never fails to deserialize.
///
/// Use with `#[serde(default)]` so absent fields also read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LooseNumber(f64);

impl LooseNumber {
    pub fn new(value: f64) -> Self {
        Self(finite_or_zero(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// The value scaled from units to millions of units.
    pub fn millions(&self) -> f64 {
        self.0 / 1_000_000.0
    }
}

impl From<f64> for LooseNumber {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for LooseNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self(normalize(&value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    mod parse_lenient {
        use super::*;

        #[test]
        fn parses_plain_decimals() {
            assert_eq!(parse_lenient("12500000.00"), 12_500_000.0);
            assert_eq!(parse_lenient("42"), 42.0);
            assert_eq!(parse_lenient(".5"), 0.5);
            assert_eq!(parse_lenient("7."), 7.0);
        }

        #[test]
        fn handles_sign_and_exponent() {
            assert_eq!(parse_lenient("-3.5"), -3.5);
            assert_eq!(parse_lenient("+2"), 2.0);
            assert_eq!(parse_lenient("1.5e6"), 1_500_000.0);
            assert_eq!(parse_lenient("2E-1"), 0.2);
        }

        #[test]
        fn ignores_trailing_garbage() {
            assert_eq!(parse_lenient("12.5 t"), 12.5);
            assert_eq!(parse_lenient("3e"), 3.0);
            assert_eq!(parse_lenient("4e+x"), 4.0);
            assert_eq!(parse_lenient("  99%  "), 99.0);
        }

        #[test]
        fn returns_zero_without_numeric_prefix() {
            assert_eq!(parse_lenient(""), 0.0);
            assert_eq!(parse_lenient("   "), 0.0);
            assert_eq!(parse_lenient("abc"), 0.0);
            assert_eq!(parse_lenient("."), 0.0);
            assert_eq!(parse_lenient("-"), 0.0);
            assert_eq!(parse_lenient("N/A"), 0.0);
        }

        #[test]
        fn returns_zero_for_non_finite_text() {
            assert_eq!(parse_lenient("NaN"), 0.0);
            assert_eq!(parse_lenient("Infinity"), 0.0);
            assert_eq!(parse_lenient("1e999"), 0.0);
        }
    }

    mod normalize {
        use super::*;

        #[test]
        fn numbers_pass_through() {
            assert_eq!(normalize(&json!(1234.5)), 1234.5);
            assert_eq!(normalize(&json!(7)), 7.0);
        }

        #[test]
        fn non_numeric_values_are_zero() {
            assert_eq!(normalize(&Value::Null), 0.0);
            assert_eq!(normalize(&json!(true)), 0.0);
            assert_eq!(normalize(&json!([1, 2])), 0.0);
            assert_eq!(normalize(&json!({"v": 1})), 0.0);
        }
    }

    mod loose_number {
        use super::*;

        #[derive(Deserialize)]
        struct Record {
            #[serde(default)]
            amount: LooseNumber,
        }

        #[test]
        fn absent_field_defaults_to_zero() {
            let record: Record = serde_json::from_str("{}").unwrap();
            assert_eq!(record.amount.value(), 0.0);
        }

        #[test]
        fn null_field_is_zero() {
            let record: Record = serde_json::from_str(r#"{"amount": null}"#).unwrap();
            assert_eq!(record.amount.value(), 0.0);
        }

        #[test]
        fn text_field_is_parsed() {
            let record: Record = serde_json::from_str(r#"{"amount": "31000000.50"}"#).unwrap();
            assert_eq!(record.amount.value(), 31_000_000.5);
        }

        #[test]
        fn millions_divides_by_one_million() {
            assert_eq!(LooseNumber::new(31_000_000.0).millions(), 31.0);
        }

        #[test]
        fn new_rejects_non_finite() {
            assert_eq!(LooseNumber::new(f64::NAN).value(), 0.0);
            assert_eq!(LooseNumber::new(f64::INFINITY).value(), 0.0);
        }
    }

    proptest! {
        #[test]
        fn parse_lenient_is_always_finite(text in ".*") {
            prop_assert!(parse_lenient(&text).is_finite());
        }

        #[test]
        fn parse_lenient_reads_formatted_floats(value in -1.0e12f64..1.0e12f64) {
            let text = format!("{}", value);
            prop_assert_eq!(parse_lenient(&text), value);
        }

        #[test]
        fn loose_number_never_fails_on_strings(text in ".*") {
            let json = serde_json::to_string(&text).unwrap();
            let number: LooseNumber = serde_json::from_str(&json).unwrap();
            prop_assert!(number.value().is_finite());
        }
    }
}
