//! Notification HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::notification::CreateNotificationInput;
use crate::AppState;

/// List all notifications
pub async fn list_notifications(State(state): State<AppState>) -> impl IntoResponse {
    let notifications = state.notifications.list().await;
    (StatusCode::OK, Json(notifications)).into_response()
}

/// Create a notification
pub async fn create_notification(
    State(state): State<AppState>,
    Json(input): Json<CreateNotificationInput>,
) -> impl IntoResponse {
    let notification = state.notifications.create(input).await;
    (StatusCode::CREATED, Json(notification)).into_response()
}

/// Mark one notification as read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.notifications.mark_read(notification_id).await {
        Ok(notification) => (StatusCode::OK, Json(notification)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Mark every notification as read
pub async fn mark_all_notifications_read(State(state): State<AppState>) -> impl IntoResponse {
    let updated = state.notifications.mark_all_read().await;
    (
        StatusCode::OK,
        Json(serde_json::json!({ "updated": updated })),
    )
        .into_response()
}

/// Delete a notification
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.notifications.delete(notification_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "deleted": notification_id })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
