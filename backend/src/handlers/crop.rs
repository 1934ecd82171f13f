//! Crop layer HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::CropService;
use crate::AppState;

/// GeoJSON layer of all crops with polygons
pub async fn list_crop_features(State(state): State<AppState>) -> impl IntoResponse {
    let service = CropService::new(state.data.clone());

    match service.crop_features().await {
        Ok(features) => (StatusCode::OK, Json(features)).into_response(),
        Err(e) => e.into_response(),
    }
}
