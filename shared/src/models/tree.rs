//! Tree (`arbol`) models

use geojson::Geometry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo;
use crate::models::{Fruit, FruitRecord, StateIndex};
use crate::types::GpsPosition;

/// A flat tree row as fetched from the data API.
///
/// The `get_arboles_with_frutos` RPC nests fruits under `frutos`; the joined
/// hierarchy query uses the singular `fruto` key, hence the alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeRecord {
    #[serde(rename = "arbol_id")]
    pub id: Uuid,
    #[serde(rename = "cultivo_id", default)]
    pub crop_id: Option<Uuid>,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "especie", default)]
    pub species: Option<String>,
    #[serde(rename = "estado_arbol", default)]
    pub state: Option<String>,
    #[serde(rename = "ubicacion", default)]
    pub location: Option<Geometry>,
    #[serde(rename = "frutos", alias = "fruto", default)]
    pub fruits: Vec<FruitRecord>,
}

/// A tree node in the assembled hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    #[serde(rename = "arbol_id")]
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "especie", default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(rename = "estado_arbol")]
    pub state: String,
    #[serde(rename = "ubicacion", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GpsPosition>,
    #[serde(rename = "fruto", default)]
    pub fruits: Vec<Fruit>,
}

impl Tree {
    pub fn from_record(record: TreeRecord, states: &StateIndex) -> Self {
        Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
            species: record.species,
            state: states.resolve(record.state.as_deref()),
            location: record.location.as_ref().and_then(geo::point_position),
            fruits: record
                .fruits
                .into_iter()
                .map(|fruit| Fruit::from_record(fruit, states))
                .collect(),
        }
    }
}
