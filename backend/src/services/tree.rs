//! Tree map-view service
//!
//! Serves every tree with its fruit states resolved and a display location:
//! the captured GPS fix when one exists, otherwise a deterministic dispersion
//! around the parent crop's centroid. Trees whose crop has no usable polygon
//! stay without a location and are only counted; the map omits them.

use std::collections::HashMap;

use geojson::{Geometry, Value};
use serde::Serialize;
use uuid::Uuid;

use shared::geo;
use shared::models::{CropRecord, StateIndex, TreeRecord};
use shared::types::GpsPosition;

use crate::error::AppResult;
use crate::external::SupabaseDataClient;

/// Tree service producing the map marker view
#[derive(Clone)]
pub struct TreeService {
    data: SupabaseDataClient,
    dispersion_delta: f64,
}

/// One tree as rendered on the map
#[derive(Debug, Clone, Serialize)]
pub struct TreeMapView {
    #[serde(rename = "arbol_id")]
    pub id: Uuid,
    #[serde(rename = "cultivo_id")]
    pub crop_id: Option<Uuid>,
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "ubicacion")]
    pub location: Option<Geometry>,
    #[serde(rename = "estado_arbol")]
    pub state: String,
    #[serde(rename = "frutos")]
    pub fruits: Vec<FruitView>,
}

/// One fruit inside a tree popup
#[derive(Debug, Clone, Serialize)]
pub struct FruitView {
    #[serde(rename = "fruto_id")]
    pub id: Uuid,
    #[serde(rename = "especie")]
    pub species: Option<String>,
    #[serde(rename = "estado_fruto")]
    pub state: String,
}

/// Response for the tree listing
#[derive(Debug, Serialize)]
pub struct TreesResponse {
    #[serde(rename = "arboles")]
    pub trees: Vec<TreeMapView>,
    #[serde(rename = "sin_ubicacion")]
    pub missing_location: u64,
}

impl TreeService {
    pub fn new(data: SupabaseDataClient, dispersion_delta: f64) -> Self {
        Self {
            data,
            dispersion_delta,
        }
    }

    pub async fn trees_with_locations(&self) -> AppResult<TreesResponse> {
        let labels = self.data.state_labels().await?;
        let states = StateIndex::from_labels(&labels);
        let trees = self.data.trees_with_fruits().await?;
        let crops = self.data.crops().await?;

        let response = resolve_tree_views(trees, &crops, &states, self.dispersion_delta);
        if response.missing_location > 0 {
            tracing::warn!(
                count = response.missing_location,
                "trees without resolvable location omitted from map"
            );
        }
        Ok(response)
    }
}

/// Resolve display locations and fruit states for a batch of tree rows.
pub fn resolve_tree_views(
    trees: Vec<TreeRecord>,
    crops: &[CropRecord],
    states: &StateIndex,
    dispersion_delta: f64,
) -> TreesResponse {
    let centroids: HashMap<Uuid, GpsPosition> = crops
        .iter()
        .filter_map(|crop| {
            crop.geometry
                .as_ref()
                .and_then(geo::ring_centroid)
                .map(|centroid| (crop.id, centroid))
        })
        .collect();

    let mut missing_location = 0u64;
    let views = trees
        .into_iter()
        .map(|tree| {
            let existing = tree.location.as_ref().and_then(geo::point_position);
            let centroid = tree.crop_id.and_then(|id| centroids.get(&id).copied());
            let resolved =
                geo::resolve_location(existing, &tree.id.to_string(), centroid, dispersion_delta);
            if resolved.is_none() {
                missing_location += 1;
            }

            TreeMapView {
                id: tree.id,
                crop_id: tree.crop_id,
                name: tree.name,
                location: resolved.map(|position| Geometry::new(Value::Point(position.lng_lat()))),
                state: states.resolve(tree.state.as_deref()),
                fruits: tree
                    .fruits
                    .into_iter()
                    .map(|fruit| FruitView {
                        id: fruit.id,
                        species: fruit.species,
                        state: states.resolve(fruit.state.as_deref()),
                    })
                    .collect(),
            }
        })
        .collect();

    TreesResponse {
        trees: views,
        missing_location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{FruitRecord, StateLabel};

    fn uuid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn states() -> StateIndex {
        StateIndex::from_labels(&[StateLabel {
            id: uuid(901),
            name: "maduro".to_string(),
        }])
    }

    fn crop_with_square(n: u128) -> CropRecord {
        CropRecord {
            id: uuid(n),
            name: format!("Lote 1 - Cultivo {n}"),
            species: None,
            lot_id: None,
            geometry: Some(Geometry::new(Value::Polygon(vec![vec![
                vec![19.9, 9.9],
                vec![20.1, 9.9],
                vec![20.1, 10.1],
                vec![19.9, 10.1],
                vec![19.9, 9.9],
            ]]))),
        }
    }

    fn tree(n: u128, crop: Option<u128>, location: Option<(f64, f64)>) -> TreeRecord {
        TreeRecord {
            id: uuid(n),
            crop_id: crop.map(uuid),
            name: Some(format!("Arbol {n}")),
            species: None,
            state: Some("maduro".to_string()),
            location: location.map(|(lng, lat)| Geometry::new(Value::Point(vec![lng, lat]))),
            fruits: vec![FruitRecord {
                id: uuid(n * 10),
                tree_id: Some(uuid(n)),
                species: None,
                state: Some(uuid(901).to_string()),
                created_at: None,
            }],
        }
    }

    fn point_of(view: &TreeMapView) -> (f64, f64) {
        match &view.location.as_ref().unwrap().value {
            Value::Point(coords) => (coords[0], coords[1]),
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_location_is_kept_unchanged() {
        let response = resolve_tree_views(
            vec![tree(1, Some(5), Some((-73.631, 6.820)))],
            &[crop_with_square(5)],
            &states(),
            0.0003,
        );
        assert_eq!(point_of(&response.trees[0]), (-73.631, 6.820));
        assert_eq!(response.missing_location, 0);
    }

    #[test]
    fn test_missing_location_disperses_around_crop_centroid() {
        let delta = 0.0004;
        let response = resolve_tree_views(
            vec![tree(1, Some(5), None), tree(2, Some(5), None), tree(3, Some(5), None)],
            &[crop_with_square(5)],
            &states(),
            delta,
        );
        // Vertex-averaged centroid of the fixture square is (19.98, 9.98).
        let points: Vec<(f64, f64)> = response.trees.iter().map(point_of).collect();
        for (lng, lat) in &points {
            assert!((lat - 9.98).abs() <= delta / 2.0 + 1e-9);
            assert!((lng - 19.98).abs() <= delta / 2.0 + 1e-9);
        }
        assert_ne!(points[0], points[1]);
        assert_ne!(points[1], points[2]);

        // Re-running yields the exact same placements.
        let again = resolve_tree_views(
            vec![tree(1, Some(5), None), tree(2, Some(5), None), tree(3, Some(5), None)],
            &[crop_with_square(5)],
            &states(),
            delta,
        );
        let again_points: Vec<(f64, f64)> = again.trees.iter().map(point_of).collect();
        assert_eq!(points, again_points);
    }

    #[test]
    fn test_unresolvable_location_stays_null_and_is_counted() {
        let response = resolve_tree_views(vec![tree(1, None, None)], &[], &states(), 0.0003);
        assert!(response.trees[0].location.is_none());
        assert_eq!(response.missing_location, 1);
    }

    #[test]
    fn test_fruit_states_resolve_label_ids() {
        let response = resolve_tree_views(
            vec![tree(1, Some(5), None)],
            &[crop_with_square(5)],
            &states(),
            0.0003,
        );
        assert_eq!(response.trees[0].fruits[0].state, "maduro");
    }
}
