//! Notification inbox.
//!
//! `GET /api/drugs/auth/notifications/`: list, newest first.
//! `PUT /api/drugs/auth/notifications/`: mark all as read.

use crate::api::client::{ApiClient, Auth};
use crate::api::error::ApiError;
use crate::models::Notification;

const NOTIFICATIONS_PATH: &str = "/api/drugs/auth/notifications/";

impl ApiClient {
    pub fn fetch_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let body = self.get(
            NOTIFICATIONS_PATH,
            Auth::IfPresent,
            "Failed to fetch notifications",
        )?;

        let rows = body.as_array().ok_or_else(|| ApiError::Decode {
            detail: "notifications response is not an array".to_string(),
        })?;

        let notifications = rows
            .iter()
            .filter_map(|row| match serde_json::from_value(row.clone()) {
                Ok(n) => Some(n),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed notification");
                    None
                }
            })
            .collect();

        Ok(notifications)
    }

    pub fn mark_notifications_read(&self) -> Result<(), ApiError> {
        self.put_empty(
            NOTIFICATIONS_PATH,
            Auth::IfPresent,
            "Failed to update notifications",
        )?;
        Ok(())
    }
}
