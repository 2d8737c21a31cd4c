use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One inbox notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Open-set discriminator the backend calls `type` (e.g. "info",
    /// "warning"); unknown values render with the default styling.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Number of unread notifications in a list.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}
