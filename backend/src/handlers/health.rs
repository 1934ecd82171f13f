//! Health check handler

use axum::Json;

/// Service health status
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
