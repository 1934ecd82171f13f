//! Crop (`cultivo`) models

use geojson::Geometry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Tree;

/// A flat crop row as fetched from the data API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropRecord {
    #[serde(rename = "cultivo_id")]
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "especie", default)]
    pub species: Option<String>,
    #[serde(rename = "lote_id", default)]
    pub lot_id: Option<Uuid>,
    #[serde(rename = "poligono", default)]
    pub geometry: Option<Geometry>,
}

/// A crop node in the assembled hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crop {
    #[serde(rename = "cultivo_id")]
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "especie", default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(rename = "poligono", default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(rename = "arbol", default)]
    pub trees: Vec<Tree>,
}

impl Crop {
    pub fn from_record(record: CropRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            species: record.species,
            geometry: record.geometry,
            trees: Vec::new(),
        }
    }
}
