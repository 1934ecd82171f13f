//! Farm (`finca`) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Lot;

/// A flat farm row as fetched from the data API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmRecord {
    #[serde(rename = "finca_id")]
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Root node of the assembled hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Farm {
    #[serde(rename = "finca_id")]
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "lote", default)]
    pub lots: Vec<Lot>,
}

impl Farm {
    pub fn from_record(record: FarmRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            created_at: record.created_at,
            lots: Vec::new(),
        }
    }
}
