//! Tree marker HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::TreeService;
use crate::AppState;

/// All trees with resolved fruit states and display locations
pub async fn list_trees(State(state): State<AppState>) -> impl IntoResponse {
    let service = TreeService::new(state.data.clone(), state.config.analysis.dispersion_delta);

    match service.trees_with_locations().await {
        Ok(trees) => (StatusCode::OK, Json(trees)).into_response(),
        Err(e) => e.into_response(),
    }
}
