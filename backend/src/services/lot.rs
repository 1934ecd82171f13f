//! Lot map-view service

use std::collections::HashMap;

use geojson::{Feature, FeatureCollection, JsonObject};
use serde_json::json;
use uuid::Uuid;

use shared::models::LotRecord;

use crate::error::AppResult;
use crate::external::SupabaseDataClient;

/// Lot service producing the GeoJSON lot layer
#[derive(Clone)]
pub struct LotService {
    data: SupabaseDataClient,
}

impl LotService {
    pub fn new(data: SupabaseDataClient) -> Self {
        Self { data }
    }

    /// All lots with a polygon, as a display-ready FeatureCollection
    pub async fn lot_features(&self) -> AppResult<FeatureCollection> {
        let lots = self.data.lots().await?;
        let farms = self.data.farms().await?;
        let farm_names: HashMap<Uuid, String> =
            farms.into_iter().map(|farm| (farm.id, farm.name)).collect();
        Ok(lot_feature_collection(lots, &farm_names))
    }
}

/// Map lot rows to display features.
///
/// Lots without a polygon are skipped; names get the `Zona N` → `Lote N`
/// display rename and the estado is lowercased, empty when absent.
pub fn lot_feature_collection(
    lots: Vec<LotRecord>,
    farm_names: &HashMap<Uuid, String>,
) -> FeatureCollection {
    let features = lots
        .into_iter()
        .filter_map(|lot| {
            let geometry = lot.geometry?;
            let farm = lot
                .farm_id
                .and_then(|id| farm_names.get(&id).cloned())
                .unwrap_or_else(|| "Sin finca".to_string());
            let state = lot.state.map(|s| s.to_lowercase()).unwrap_or_default();

            let mut properties = JsonObject::new();
            properties.insert("lote_id".to_string(), json!(lot.id));
            properties.insert("nombre".to_string(), json!(display_lot_name(&lot.name)));
            properties.insert("finca".to_string(), json!(farm));
            properties.insert("estado".to_string(), json!(state));

            Some(Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Rename a leading `Zona` token to `Lote` for display.
pub fn display_lot_name(name: &str) -> String {
    match name.strip_prefix("Zona") {
        Some(rest) if rest.starts_with(char::is_whitespace) => {
            format!("Lote {}", rest.trim_start())
        }
        _ => name.to_string(),
    }
}
