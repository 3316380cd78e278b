//! Hydroponic growing unit models

use serde::{Deserialize, Deserializer, Serialize};

use crate::lenient::Fields;

/// A hydroponic growing unit (NFT channel, DWC raft, tower, ...)
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GrowingUnit {
    pub id: String,
    pub name: String,
    pub system_type: Option<String>,
    pub location: Option<String>,
    /// Number of plant sites
    pub capacity: Option<i64>,
}

impl From<&Fields> for GrowingUnit {
    fn from(fields: &Fields) -> Self {
        Self {
            id: fields.id(&["id"]),
            name: fields.text(&["name", "nombre"]),
            system_type: fields.optional_text(&["systemType", "system_type", "tipoSistema"]),
            location: fields.optional_text(&["location", "ubicacion"]),
            capacity: fields.order(&["capacity", "capacidad"]),
        }
    }
}

impl<'de> Deserialize<'de> for GrowingUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Fields::deserialize(deserializer).map(|fields| GrowingUnit::from(&fields))
    }
}

impl GrowingUnit {
    /// Name shown next to a harvest, e.g. "Torre 3 (NFT)"
    pub fn display_name(&self) -> String {
        match &self.system_type {
            Some(system) => format!("{} ({})", self.name, system),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_unit() {
        let unit: GrowingUnit = serde_json::from_value(json!({
            "id": 3,
            "nombre": "Torre 3",
            "tipoSistema": "NFT",
            "capacidad": "48"
        }))
        .unwrap();

        assert_eq!(unit.id, "3");
        assert_eq!(unit.capacity, Some(48));
        assert_eq!(unit.display_name(), "Torre 3 (NFT)");
    }
}
