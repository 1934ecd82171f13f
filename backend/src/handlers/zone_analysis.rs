//! Zone analysis HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::ZoneAnalysisService;
use crate::AppState;

/// Combined map layer, totals, and generated notifications
pub async fn get_zone_analysis(State(state): State<AppState>) -> impl IntoResponse {
    let service =
        ZoneAnalysisService::new(state.data.clone(), state.config.analysis.dispersion_delta);

    match service.analyze().await {
        Ok(analysis) => (StatusCode::OK, Json(analysis)).into_response(),
        Err(e) => e.into_response(),
    }
}
