//! Fruit (`fruto`) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::StateIndex;

/// A flat fruit row as fetched from the data API.
///
/// `estado_fruto` may carry a state-label id or an inline state name,
/// depending on which upstream path produced the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FruitRecord {
    #[serde(rename = "fruto_id")]
    pub id: Uuid,
    #[serde(rename = "arbol_id", default, skip_serializing_if = "Option::is_none")]
    pub tree_id: Option<Uuid>,
    #[serde(rename = "especie", default)]
    pub species: Option<String>,
    #[serde(rename = "estado_fruto", default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A leaf fruit node with its state fully resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fruit {
    #[serde(rename = "fruto_id")]
    pub id: Uuid,
    #[serde(rename = "especie", default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(rename = "estado_fruto")]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Fruit {
    pub fn from_record(record: FruitRecord, states: &StateIndex) -> Self {
        Self {
            id: record.id,
            species: record.species,
            state: states.resolve(record.state.as_deref()),
            created_at: record.created_at,
        }
    }
}
