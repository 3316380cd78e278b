//! Lenient decoding of loosely typed API payloads
//!
//! The greenhouse API is not strict about field types: durations arrive as
//! numbers, numeric strings, `null` or garbage, and ids as either numbers or
//! strings. Records are read through [`Fields`], which coerces bad values to
//! safe defaults instead of failing the whole record.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A JSON object whose fields may go by several names.
///
/// The API mixes camelCase, snake_case and Spanish keys, sometimes for the
/// same field within one record. Lookups take the candidate keys in order of
/// preference and use the first one holding a non-null value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    pub fn get(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    /// Identifier sent as a number or a string, empty when absent
    pub fn id(&self, keys: &[&str]) -> String {
        self.optional_id(keys).unwrap_or_default()
    }

    pub fn optional_id(&self, keys: &[&str]) -> Option<String> {
        self.get(keys).and_then(scalar_to_string)
    }

    /// Display text; numbers and booleans are rendered, everything else is empty
    pub fn text(&self, keys: &[&str]) -> String {
        self.get(keys).and_then(scalar_to_string).unwrap_or_default()
    }

    /// Free text where blank means absent
    pub fn optional_text(&self, keys: &[&str]) -> Option<String> {
        self.get(keys)
            .and_then(scalar_to_string)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn timestamp(&self, keys: &[&str]) -> Option<DateTime<Utc>> {
        self.get(keys).and_then(coerce_timestamp)
    }

    /// Planned hours: anything that is not a non-negative number becomes zero
    pub fn hours(&self, keys: &[&str]) -> Decimal {
        self.get(keys).map(coerce_hours).unwrap_or(Decimal::ZERO)
    }

    pub fn order(&self, keys: &[&str]) -> Option<i64> {
        self.get(keys).and_then(coerce_order)
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        Fields(map)
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Fields)
    }
}

/// Coerce a JSON value into non-negative hours
pub fn coerce_hours(value: &Value) -> Decimal {
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    };

    match parsed {
        Some(hours) if hours > Decimal::ZERO => hours,
        _ => Decimal::ZERO,
    }
}

/// Coerce a JSON value into an order index, truncating fractional values
pub fn coerce_order(value: &Value) -> Option<i64> {
    let float = match value {
        Value::Number(n) => {
            if let Some(int) = n.as_i64() {
                return Some(int);
            }
            n.as_f64()
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(int) = s.parse::<i64>() {
                return Some(int);
            }
            s.parse::<f64>().ok()
        }
        _ => None,
    }?;

    if float.is_finite() && float.abs() < i64::MAX as f64 {
        Some(float.trunc() as i64)
    } else {
        None
    }
}

/// Coerce a JSON value into an instant.
///
/// Strings go through [`parse_timestamp`]; numbers are epoch milliseconds,
/// fractional ones truncated toward zero.
pub fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_timestamp(raw),
        Value::Number(n) => {
            let millis = match n.as_i64() {
                Some(millis) => millis,
                None => {
                    let float = n.as_f64()?;
                    if !float.is_finite() || float.abs() >= i64::MAX as f64 {
                        return None;
                    }
                    float.trunc() as i64
                }
            };
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

/// Parse a timestamp sent by the API.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC, with
/// either `T` or a space as separator) and plain `YYYY-MM-DD` (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .ok()
        .or_else(|| Decimal::from_scientific(raw).ok())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
