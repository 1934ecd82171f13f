//! Zone analysis service
//!
//! Builds the combined map layer (located trees + crop polygons), dataset
//! totals, and the generated notifications in one response, so the client
//! can paint the zones screen from a single request.

use geojson::{Feature, FeatureCollection, JsonObject};
use serde::Serialize;
use serde_json::json;

use shared::hierarchy::{self, ZoneStats};
use shared::models::{CropRecord, Lot, StateIndex};

use crate::error::AppResult;
use crate::external::SupabaseDataClient;
use crate::services::notification::{self, Notification};
use crate::services::tree::{self, TreesResponse};

/// Zone analysis service
#[derive(Clone)]
pub struct ZoneAnalysisService {
    data: SupabaseDataClient,
    dispersion_delta: f64,
}

/// Dataset totals for the analyzed zones
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AnalysisTotals {
    #[serde(rename = "total_arboles")]
    pub trees: u64,
    #[serde(rename = "total_cultivos")]
    pub crops: u64,
    #[serde(rename = "total_features")]
    pub features: u64,
}

/// Full zone analysis response
#[derive(Debug, Serialize)]
pub struct ZoneAnalysis {
    pub geojson: FeatureCollection,
    pub stats: AnalysisTotals,
    pub notifications: Vec<Notification>,
}

impl ZoneAnalysisService {
    pub fn new(data: SupabaseDataClient, dispersion_delta: f64) -> Self {
        Self {
            data,
            dispersion_delta,
        }
    }

    pub async fn analyze(&self) -> AppResult<ZoneAnalysis> {
        let labels = self.data.state_labels().await?;
        let states = StateIndex::from_labels(&labels);
        let trees = self.data.trees_with_fruits().await?;
        let crops = self.data.crops().await?;
        let lots = self.data.lots().await?;

        let tree_views = tree::resolve_tree_views(trees, &crops, &states, self.dispersion_delta);
        let (geojson, totals) = analysis_features(&tree_views, crops);

        let productive: Vec<Lot> = lots
            .into_iter()
            .map(Lot::from_record)
            .filter(hierarchy::is_productive)
            .collect();
        let zone_stats = ZoneStats::from_lots(productive.iter());

        let mut notifications = notification::zone_notifications(&zone_stats);
        notifications.extend(notification::system_notifications(&totals));

        Ok(ZoneAnalysis {
            geojson,
            stats: totals,
            notifications,
        })
    }
}

/// Combine located trees and crop polygons into one feature collection.
pub fn analysis_features(
    tree_views: &TreesResponse,
    crops: Vec<CropRecord>,
) -> (FeatureCollection, AnalysisTotals) {
    let mut features = Vec::new();
    let mut totals = AnalysisTotals::default();

    for tree in &tree_views.trees {
        let Some(location) = &tree.location else {
            continue;
        };
        let mut properties = JsonObject::new();
        properties.insert("arbol_id".to_string(), json!(tree.id));
        properties.insert("nombre".to_string(), json!(tree.name));
        properties.insert("estado_arbol".to_string(), json!(tree.state));
        properties.insert("tipo".to_string(), json!("arbol"));
        properties.insert("frutos".to_string(), json!(tree.fruits));
        properties.insert("cultivo_id".to_string(), json!(tree.crop_id));
        features.push(Feature {
            bbox: None,
            geometry: Some(location.clone()),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
        totals.trees += 1;
    }

    for crop in crops {
        let Some(geometry) = crop.geometry else {
            continue;
        };
        let mut properties = JsonObject::new();
        properties.insert("cultivo_id".to_string(), json!(crop.id));
        properties.insert("nombre".to_string(), json!(crop.name));
        properties.insert("tipo".to_string(), json!("cultivo"));
        properties.insert("lote_id".to_string(), json!(crop.lot_id));
        features.push(Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
        totals.crops += 1;
    }

    totals.features = totals.trees + totals.crops;
    (
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        totals,
    )
}
