//! Crop map-view service

use std::collections::HashMap;

use geojson::{Feature, FeatureCollection, JsonObject};
use serde_json::json;
use uuid::Uuid;

use shared::hierarchy::{crop_name_prefix, swapped_name_key};
use shared::models::{CropRecord, LotRecord};
use shared::normalize::normalize;

use crate::error::AppResult;
use crate::external::SupabaseDataClient;

/// Crop service producing the GeoJSON crop layer
#[derive(Clone)]
pub struct CropService {
    data: SupabaseDataClient,
}

impl CropService {
    pub fn new(data: SupabaseDataClient) -> Self {
        Self { data }
    }

    /// All crops with a polygon, remapped onto the lots that carry geometry
    pub async fn crop_features(&self) -> AppResult<FeatureCollection> {
        let crops = self.data.crops().await?;
        let lots = self.data.lots().await?;
        Ok(crop_feature_collection(crops, &lots))
    }
}

/// Map crop rows to display features.
///
/// Crop rows often reference lots that never got a polygon drawn; the crop
/// name prefix ("Lote 3 - Cultivo C3" → "Lote 3") is matched against the
/// polygon-bearing lots, tolerating the `Lote`⇄`Zona` naming drift. The
/// declared `lote_id` is kept only when no name match exists.
pub fn crop_feature_collection(crops: Vec<CropRecord>, lots: &[LotRecord]) -> FeatureCollection {
    let mut lot_by_key: HashMap<String, Uuid> = HashMap::new();
    for lot in lots.iter().filter(|lot| lot.geometry.is_some()) {
        let key = normalize(&lot.name);
        let swapped = swapped_name_key(&key);
        lot_by_key.entry(key).or_insert(lot.id);
        if let Some(swapped) = swapped {
            lot_by_key.entry(swapped).or_insert(lot.id);
        }
    }

    let features = crops
        .into_iter()
        .filter_map(|crop| {
            let geometry = crop.geometry?;
            let prefix = normalize(crop_name_prefix(&crop.name));
            let mapped = lot_by_key
                .get(&prefix)
                .copied()
                .or_else(|| swapped_name_key(&prefix).and_then(|key| lot_by_key.get(&key).copied()));
            let lot_id = mapped.or(crop.lot_id);

            let mut properties = JsonObject::new();
            properties.insert("cultivo_id".to_string(), json!(crop.id));
            properties.insert("nombre".to_string(), json!(crop.name));
            properties.insert(
                "especie".to_string(),
                json!(crop.species.unwrap_or_else(|| "Cacao".to_string())),
            );
            properties.insert("lote_id".to_string(), json!(lot_id));

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
