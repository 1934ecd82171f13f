//! Notification model, generation rules, and in-memory store
//!
//! Notifications are generated from zone analysis as plain data; delivery
//! (toasts, the bell) is the client's concern. The store keeps them in
//! memory for the lifetime of the process.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::hierarchy::ZoneStats;

use crate::error::{AppError, AppResult};
use crate::services::zone_analysis::AnalysisTotals;

/// Notification severity, mirrored by the client's toast styles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Optional call-to-action attached to a notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
    pub target: String,
}

/// A notification as served to the client
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(rename = "duration")]
    pub duration_ms: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<NotificationAction>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    fn new(
        kind: NotificationKind,
        title: &str,
        message: String,
        duration_ms: u32,
        action: Option<NotificationAction>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.to_string(),
            message,
            duration_ms,
            action,
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// Input for creating a notification through the API
#[derive(Debug, Deserialize)]
pub struct CreateNotificationInput {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(rename = "duration", default = "default_duration")]
    pub duration_ms: u32,
    #[serde(default)]
    pub action: Option<NotificationAction>,
}

fn default_duration() -> u32 {
    5_000
}

fn map_action(label: &str) -> Option<NotificationAction> {
    Some(NotificationAction {
        label: label.to_string(),
        target: "map".to_string(),
    })
}

/// Zone alerts from the productive-lot stats, diseased lots first.
pub fn zone_notifications(stats: &ZoneStats) -> Vec<Notification> {
    let mut notifications = Vec::new();

    if !stats.diseased.is_empty() {
        notifications.push(Notification::new(
            NotificationKind::Error,
            "Lotes enfermos",
            format!(
                "{} lotes enfermos: {}",
                stats.diseased.len(),
                stats.diseased.join(", ")
            ),
            12_000,
            map_action("Ver mapa"),
        ));
    }

    if !stats.mature.is_empty() {
        notifications.push(Notification::new(
            NotificationKind::Warning,
            "Listos para cosecha",
            format!(
                "{} lotes listos: {}",
                stats.mature.len(),
                stats.mature.join(", ")
            ),
            8_000,
            map_action("Ver ubicaciones"),
        ));
    }

    let advanced = stats.mature.len() + stats.transition.len();
    if advanced > 0 {
        if let Some(share) = stats.advanced_share_percent() {
            notifications.push(Notification::new(
                NotificationKind::Success,
                "Progreso",
                format!("{share:.1}% de la finca está en etapa avanzada"),
                6_000,
                None,
            ));
        }
    }

    notifications
}

/// System notices about the loaded dataset.
pub fn system_notifications(totals: &AnalysisTotals) -> Vec<Notification> {
    if totals.trees > 0 {
        vec![Notification::new(
            NotificationKind::Info,
            "Sistema iniciado",
            format!(
                "Sistema cargado con {} árboles y {} cultivos",
                totals.trees, totals.crops
            ),
            5_000,
            None,
        )]
    } else {
        vec![Notification::new(
            NotificationKind::Warning,
            "Sin datos",
            "No se encontraron árboles activos en el sistema".to_string(),
            8_000,
            None,
        )]
    }
}

/// In-memory notification store shared across handlers
#[derive(Clone, Default)]
pub struct NotificationStore {
    inner: Arc<RwLock<Vec<Notification>>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<Notification> {
        self.inner.read().await.clone()
    }

    pub async fn create(&self, input: CreateNotificationInput) -> Notification {
        let notification = Notification::new(
            input.kind,
            &input.title,
            input.message,
            input.duration_ms,
            input.action,
        );
        self.inner.write().await.push(notification.clone());
        notification
    }

    pub async fn mark_read(&self, id: Uuid) -> AppResult<Notification> {
        let mut notifications = self.inner.write().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| AppError::NotFound("Notification".to_string()))?;
        notification.read = true;
        Ok(notification.clone())
    }

    pub async fn mark_all_read(&self) -> u64 {
        let mut notifications = self.inner.write().await;
        let mut updated = 0;
        for notification in notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            updated += 1;
        }
        updated
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut notifications = self.inner.write().await;
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        if notifications.len() == before {
            return Err(AppError::NotFound("Notification".to_string()));
        }
        Ok(())
    }
}
