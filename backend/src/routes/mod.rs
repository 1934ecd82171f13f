//! Route definitions for the CocoaApp backend

use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Map layers
        .route("/lotes", get(handlers::list_lot_features))
        .route("/cultivos", get(handlers::list_crop_features))
        .route("/arboles", get(handlers::list_trees))
        // Statistics
        .nest("/stats", stats_routes())
        // Zone analysis
        .route("/zone-analysis", get(handlers::get_zone_analysis))
        // Notifications
        .nest("/notifications", notification_routes())
}

/// Statistics routes
fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_stats))
        .route("/fincas", get(handlers::list_farms))
        .route("/lotes", get(handlers::list_farm_lots))
        .route("/zones", get(handlers::get_zones))
}

/// Notification management routes
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_notifications).post(handlers::create_notification),
        )
        .route("/read-all", put(handlers::mark_all_notifications_read))
        .route(
            "/:notification_id/read",
            put(handlers::mark_notification_read),
        )
        .route("/:notification_id", delete(handlers::delete_notification))
}
