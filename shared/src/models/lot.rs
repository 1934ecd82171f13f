//! Lot (`lote`) models

use geojson::Geometry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Crop;

/// A flat lot row as fetched from the data API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotRecord {
    #[serde(rename = "lote_id")]
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "finca_id", default)]
    pub farm_id: Option<Uuid>,
    #[serde(rename = "estado", default)]
    pub state: Option<String>,
    #[serde(rename = "poligono", default)]
    pub geometry: Option<Geometry>,
}

/// A lot node in the assembled hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lot {
    #[serde(rename = "lote_id")]
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "poligono", default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(rename = "cultivo", default)]
    pub crops: Vec<Crop>,
}

impl Lot {
    pub fn from_record(record: LotRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            state: record.state,
            geometry: record.geometry,
            crops: Vec::new(),
        }
    }
}
