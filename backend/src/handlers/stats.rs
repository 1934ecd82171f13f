//! Statistics HTTP handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::services::stats::{StatsFilter, StatsService};
use crate::AppState;

/// Query for lots-by-farm lookups
#[derive(Debug, Deserialize)]
pub struct FarmQuery {
    pub finca_id: Uuid,
}

/// Complete statistics, optionally scoped by farm and lot
pub async fn get_stats(
    State(state): State<AppState>,
    Query(filter): Query<StatsFilter>,
) -> impl IntoResponse {
    let service = StatsService::new(state.data.clone());

    match service.stats(filter).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Farm list for filters
pub async fn list_farms(State(state): State<AppState>) -> impl IntoResponse {
    let service = StatsService::new(state.data.clone());

    match service.farms().await {
        Ok(farms) => (StatusCode::OK, Json(farms)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Lots of a specific farm for filters
pub async fn list_farm_lots(
    State(state): State<AppState>,
    Query(query): Query<FarmQuery>,
) -> impl IntoResponse {
    let service = StatsService::new(state.data.clone());

    match service.lots_by_farm(query.finca_id).await {
        Ok(lots) => (StatusCode::OK, Json(lots)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Full nested hierarchy for the zones screen
pub async fn get_zones(State(state): State<AppState>) -> impl IntoResponse {
    let service = StatsService::new(state.data.clone());

    match service.zones().await {
        Ok(farms) => (StatusCode::OK, Json(farms)).into_response(),
        Err(e) => e.into_response(),
    }
}
