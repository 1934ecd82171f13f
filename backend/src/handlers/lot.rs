//! Lot layer HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::LotService;
use crate::AppState;

/// GeoJSON layer of all lots with polygons
pub async fn list_lot_features(State(state): State<AppState>) -> impl IntoResponse {
    let service = LotService::new(state.data.clone());

    match service.lot_features().await {
        Ok(features) => (StatusCode::OK, Json(features)).into_response(),
        Err(e) => e.into_response(),
    }
}
