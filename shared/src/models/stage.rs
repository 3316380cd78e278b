//! Growth stage models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::lenient::Fields;

/// A stage template from the global catalog (germination, vegetative, ...)
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StageDefinition {
    pub id: String,
    pub name: String,
    /// Position within the sequence; stages are processed in ascending order
    pub order_index: Option<i64>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub duration_hours: Decimal,
    pub notes: Option<String>,
}

impl From<&Fields> for StageDefinition {
    fn from(fields: &Fields) -> Self {
        Self {
            id: fields.id(&["id"]),
            name: fields.text(&["name", "nombre"]),
            order_index: fields.order(&["orderIndex", "order_index", "order", "orden"]),
            duration_hours: fields.hours(&["durationHours", "duration_hours", "duracionHoras"]),
            notes: fields.optional_text(&["notes", "notas"]),
        }
    }
}

impl<'de> Deserialize<'de> for StageDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Fields::deserialize(deserializer).map(|fields| StageDefinition::from(&fields))
    }
}

impl StageDefinition {
    pub fn new(name: impl Into<String>, order_index: i64, duration_hours: Decimal) -> Self {
        Self {
            name: name.into(),
            order_index: Some(order_index),
            duration_hours,
            ..Default::default()
        }
    }

    /// Planned duration, never negative
    pub fn planned_hours(&self) -> Decimal {
        self.duration_hours.max(Decimal::ZERO)
    }
}

/// Status of a projected stage relative to the evaluation instant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageStatus {
    Pending,
    Active,
    Finished,
}

impl StageStatus {
    /// Intervals are start-inclusive and end-exclusive: a stage whose end
    /// equals `now` is already finished.
    pub fn evaluate(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now >= end {
            StageStatus::Finished
        } else if now >= start {
            StageStatus::Active
        } else {
            StageStatus::Pending
        }
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageStatus::Pending => write!(f, "Pending"),
            StageStatus::Active => write!(f, "Active"),
            StageStatus::Finished => write!(f, "Finished"),
        }
    }
}

/// A stage definition placed on a concrete harvest's calendar
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedStage {
    pub stage_id: String,
    pub name: String,
    pub order_index: Option<i64>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub duration_hours: Decimal,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
