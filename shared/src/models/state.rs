//! Cacao state label vocabulary

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::normalize::normalize;

/// Sentinel bucket for fruits whose state cannot be resolved.
pub const UNKNOWN_STATE: &str = "Desconocido";

/// A row of the `estado_cacao` vocabulary table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateLabel {
    #[serde(rename = "estado_cacao_id")]
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Lookup index over the state vocabulary.
///
/// Fruit rows reference their state either by label id or by an inline name;
/// name lookups are case- and accent-insensitive.
#[derive(Debug, Clone, Default)]
pub struct StateIndex {
    by_id: HashMap<Uuid, String>,
    by_key: HashMap<String, String>,
}

impl StateIndex {
    pub fn from_labels(labels: &[StateLabel]) -> Self {
        let mut index = Self::default();
        for label in labels {
            index.by_id.insert(label.id, label.name.clone());
            index
                .by_key
                .entry(normalize(&label.name))
                .or_insert_with(|| label.name.clone());
        }
        index
    }

    /// Resolve a raw state value to a display name.
    ///
    /// A UUID-shaped value is looked up by id, a known name is canonicalized
    /// to the vocabulary spelling, any other non-empty value is kept
    /// verbatim, and everything else falls back to [`UNKNOWN_STATE`].
    pub fn resolve(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return UNKNOWN_STATE.to_string();
        };
        if let Ok(id) = Uuid::parse_str(raw) {
            return self
                .by_id
                .get(&id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_STATE.to_string());
        }
        self.by_key
            .get(&normalize(raw))
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }
}
