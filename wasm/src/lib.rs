//! WebAssembly module for CocoaApp map clients
//!
//! Provides client-side computation for:
//! - Deterministic marker dispersion for trees without a GPS fix
//! - Fruit-state counting over the nested farm hierarchy
//! - Structural censuses for summary panels

use wasm_bindgen::prelude::*;

use shared::geo;
use shared::hierarchy;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Deterministic string hash used for marker dispersion
#[wasm_bindgen]
pub fn simple_hash(id: &str) -> u32 {
    geo::simple_hash(id)
}

/// Deterministic `[latOffset, lngOffset]` for an entity id
#[wasm_bindgen]
pub fn offset_from_hash(id: &str, delta: f64) -> Vec<f64> {
    let (lat_offset, lng_offset) = geo::offset_from_hash(id, delta);
    vec![lat_offset, lng_offset]
}

/// Resolve a display location for a tree row (JSON in, JSON out).
///
/// Returns the tree's own location when present, otherwise a dispersed
/// position around the given centroid; `null` when neither exists.
#[wasm_bindgen]
pub fn resolve_tree_location(
    tree_json: &str,
    centroid_lat: f64,
    centroid_lng: f64,
    delta: f64,
) -> Result<String, JsValue> {
    let tree: TreeRecord = serde_json::from_str(tree_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid tree JSON: {}", e)))?;

    let existing = tree.location.as_ref().and_then(geo::point_position);
    let resolved = geo::resolve_location(
        existing,
        &tree.id.to_string(),
        Some(GpsPosition::new(centroid_lat, centroid_lng)),
        delta,
    );

    serde_json::to_string(&resolved)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Count fruit states across a nested farm hierarchy (JSON in, JSON out)
#[wasm_bindgen]
pub fn count_fruit_states(farms_json: &str) -> Result<String, JsValue> {
    let farms: Vec<Farm> = serde_json::from_str(farms_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid farms JSON: {}", e)))?;

    let counts = hierarchy::count_states(&farms);
    serde_json::to_string(&counts)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Structural census of a nested farm hierarchy (JSON in, JSON out)
#[wasm_bindgen]
pub fn count_structure(farms_json: &str) -> Result<String, JsValue> {
    let farms: Vec<Farm> = serde_json::from_str(farms_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid farms JSON: {}", e)))?;

    let counts = hierarchy::count_structure(&farms);
    serde_json::to_string(&counts)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Resolve a raw fruit state against the state vocabulary (JSON labels in)
#[wasm_bindgen]
pub fn resolve_fruit_state(labels_json: &str, raw_state: Option<String>) -> Result<String, JsValue> {
    let labels: Vec<StateLabel> = serde_json::from_str(labels_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid labels JSON: {}", e)))?;

    let index = StateIndex::from_labels(&labels);
    Ok(index.resolve(raw_state.as_deref()))
}
