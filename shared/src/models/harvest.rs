//! Harvest ("cosecha") models

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::{Validate, ValidationError};

use crate::lenient::Fields;

/// A harvest record: one growing cycle assigned to a hydroponic unit
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Harvest {
    pub id: String,
    pub unit_id: Option<String>,
    pub name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub status: HarvestStatus,
    pub observations: Option<String>,
}

impl From<&Fields> for Harvest {
    fn from(fields: &Fields) -> Self {
        Self {
            id: fields.id(&["id"]),
            unit_id: fields.optional_id(&["unitId", "unit_id", "unidadId"]),
            name: fields.text(&["name", "nombre"]),
            start_date: fields.timestamp(&["startDate", "start_date", "fechaInicio"]),
            status: fields
                .get(&["status", "estado"])
                .map(HarvestStatus::from_value)
                .unwrap_or_default(),
            observations: fields.optional_text(&["observations", "observaciones"]),
        }
    }
}

impl<'de> Deserialize<'de> for Harvest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Fields::deserialize(deserializer).map(|fields| Harvest::from(&fields))
    }
}

impl Harvest {
    pub fn is_finished(&self) -> bool {
        self.status == HarvestStatus::Finished
    }
}

/// Lifecycle status of a harvest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HarvestStatus {
    #[default]
    Active,
    Paused,
    /// Finished, either by completing its stages or finalized manually
    Finished,
}

impl HarvestStatus {
    /// Value understood by the greenhouse API
    pub fn as_api_str(&self) -> &'static str {
        match self {
            HarvestStatus::Active => "ACTIVA",
            HarvestStatus::Paused => "PAUSADA",
            HarvestStatus::Finished => "FINALIZADA",
        }
    }

    /// Parse a status, treating unknown values as active
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// Status from a raw JSON value; anything but a known string is active
    pub fn from_value(value: &serde_json::Value) -> Self {
        value.as_str().map(Self::parse_lenient).unwrap_or_default()
    }
}

impl FromStr for HarvestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', ' '], "_").as_str() {
            "ACTIVE" | "ACTIVA" | "EN_CURSO" | "IN_PROGRESS" => Ok(HarvestStatus::Active),
            "PAUSED" | "PAUSADA" => Ok(HarvestStatus::Paused),
            "FINISHED" | "FINALIZADA" | "COMPLETADA" | "COMPLETED" => Ok(HarvestStatus::Finished),
            _ => Err(format!("Invalid harvest status: {s}")),
        }
    }
}

impl std::fmt::Display for HarvestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarvestStatus::Active => write!(f, "Active"),
            HarvestStatus::Paused => write!(f, "Paused"),
            HarvestStatus::Finished => write!(f, "Finished"),
        }
    }
}

impl Serialize for HarvestStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_api_str())
    }
}

impl<'de> Deserialize<'de> for HarvestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().map(HarvestStatus::from_value).unwrap_or_default())
    }
}

/// Form submission for a new harvest
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewHarvest {
    #[validate(length(min = 1, max = 64, message = "Unit is required"))]
    pub unit_id: String,
    #[validate(
        length(min = 1, max = 120, message = "Name must be 1-120 characters"),
        custom = "not_blank"
    )]
    pub name: String,
    /// Defaults to the creation time on the server when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[validate(length(max = 2000, message = "Observations are limited to 2000 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Body of a status change request
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HarvestStatusUpdate {
    pub status: HarvestStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_status_parsing() {
        assert_eq!("FINALIZADA".parse::<HarvestStatus>(), Ok(HarvestStatus::Finished));
        assert_eq!("finished".parse::<HarvestStatus>(), Ok(HarvestStatus::Finished));
        assert_eq!("Pausada".parse::<HarvestStatus>(), Ok(HarvestStatus::Paused));
        assert_eq!("en curso".parse::<HarvestStatus>(), Ok(HarvestStatus::Active));
        assert!("archived".parse::<HarvestStatus>().is_err());
        assert_eq!(HarvestStatus::parse_lenient("archived"), HarvestStatus::Active);
    }

    #[test]
    fn test_deserialize_spanish_payload() {
        let harvest: Harvest = serde_json::from_value(json!({
            "id": 7,
            "unidadId": 3,
            "nombre": "Lechuga lote A",
            "fechaInicio": "2025-01-01",
            "estado": "FINALIZADA",
            "observaciones": "Sin plagas"
        }))
        .unwrap();

        assert_eq!(harvest.id, "7");
        assert_eq!(harvest.unit_id.as_deref(), Some("3"));
        assert_eq!(harvest.name, "Lechuga lote A");
        assert_eq!(
            harvest.start_date,
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(harvest.is_finished());
        assert_eq!(harvest.observations.as_deref(), Some("Sin plagas"));
    }

    #[test]
    fn test_deserialize_malformed_fields() {
        let harvest: Harvest = serde_json::from_value(json!({
            "id": "h-1",
            "startDate": "yesterday",
            "status": 12
        }))
        .unwrap();

        assert_eq!(harvest.start_date, None);
        assert_eq!(harvest.status, HarvestStatus::Active);
        assert_eq!(harvest.unit_id, None);
    }

    #[test]
    fn test_deserialize_with_duplicate_keys() {
        let harvest: Harvest = serde_json::from_value(json!({
            "id": 9,
            "status": "PAUSADA",
            "estado": "FINALIZADA",
            "startDate": "2025-01-01T00:00:00Z",
            "fechaInicio": "2024-06-01",
            "name": null,
            "nombre": "Rúcula"
        }))
        .unwrap();

        assert_eq!(harvest.status, HarvestStatus::Paused);
        assert_eq!(
            harvest.start_date,
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(harvest.name, "Rúcula");
    }

    #[test]
    fn test_deserialize_float_epoch_start() {
        let harvest: Harvest =
            serde_json::from_value(json!({ "id": 1, "startDate": 1735689600000.0 })).unwrap();
        assert_eq!(
            harvest.start_date,
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_serialized_harvest_reads_back() {
        let harvest = Harvest {
            id: "4".to_string(),
            unit_id: Some("2".to_string()),
            name: "Espinaca".to_string(),
            start_date: Some(Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap()),
            status: HarvestStatus::Finished,
            observations: None,
        };
        let json = serde_json::to_value(&harvest).unwrap();
        assert_eq!(serde_json::from_value::<Harvest>(json).unwrap(), harvest);
    }

    #[test]
    fn test_status_serializes_for_api() {
        let body = serde_json::to_value(HarvestStatusUpdate {
            status: HarvestStatus::Finished,
        })
        .unwrap();
        assert_eq!(body, json!({ "status": "FINALIZADA" }));
    }

    #[test]
    fn test_new_harvest_validation() {
        let valid = NewHarvest {
            unit_id: "3".to_string(),
            name: "Albahaca".to_string(),
            start_date: None,
            observations: None,
        };
        assert!(valid.validate().is_ok());

        let blank = NewHarvest {
            name: "   ".to_string(),
            ..valid.clone()
        };
        assert!(blank.validate().is_err());

        let no_unit = NewHarvest {
            unit_id: String::new(),
            ..valid.clone()
        };
        let errors = no_unit.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("unit_id"));

        let long_notes = NewHarvest {
            observations: Some("x".repeat(2001)),
            ..valid
        };
        assert!(long_notes.validate().is_err());
    }
}
