//! Common types used across the platform

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Supported languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Spanish,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::English => "en",
        }
    }

    /// Resolve a language from a code such as `es`, `en-US` or `English`.
    /// Unknown codes fall back to the default language.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_ascii_lowercase();
        if code.starts_with("en") {
            Language::English
        } else {
            Language::Spanish
        }
    }
}

/// Add a (non-negative) number of wall-clock hours to a timestamp.
///
/// Hours are applied with millisecond precision. Results past the last
/// representable instant saturate instead of overflowing.
pub fn add_hours(start: DateTime<Utc>, hours: Decimal) -> DateTime<Utc> {
    let millis = hours
        .max(Decimal::ZERO)
        .checked_mul(Decimal::from(MILLIS_PER_HOUR))
        .and_then(|m| m.round().to_i64())
        .unwrap_or(i64::MAX);

    start
        .checked_add_signed(Duration::milliseconds(millis))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Hours from `start` to `end`; negative when `end` precedes `start`.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    let millis = end.signed_duration_since(start).num_milliseconds();
    Decimal::from(millis) / Decimal::from(MILLIS_PER_HOUR)
}

/// Addition that pins at `Decimal::MAX` instead of panicking.
pub fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(Decimal::MAX)
}
