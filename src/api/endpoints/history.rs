//! Scan history.
//!
//! `GET /api/drugs/history/`: list the user's past scans.
//! `DELETE /api/drugs/history/`: remove one scan by id.

use serde_json::json;

use crate::api::client::{ApiClient, Auth};
use crate::api::error::ApiError;
use crate::models::HistoryEntry;

const HISTORY_PATH: &str = "/api/drugs/history/";

impl ApiClient {
    /// Past scans, newest first as the backend orders them.
    ///
    /// Rows that fail to parse are skipped rather than failing the whole
    /// listing.
    pub fn fetch_history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        let body = self.get(HISTORY_PATH, Auth::IfPresent, "Failed to fetch history")?;

        let rows = body.as_array().ok_or_else(|| ApiError::Decode {
            detail: "history response is not an array".to_string(),
        })?;

        let entries: Vec<HistoryEntry> = rows
            .iter()
            .filter_map(|row| match serde_json::from_value(row.clone()) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed history row");
                    None
                }
            })
            .collect();

        Ok(entries)
    }

    /// Delete a single scan record.
    pub fn delete_scan(&self, scan_id: i64) -> Result<(), ApiError> {
        let body = json!({ "scan_id": scan_id });
        self.delete(HISTORY_PATH, Some(&body), Auth::IfPresent, "Failed to delete item")?;
        tracing::info!(scan_id, "Scan record deleted");
        Ok(())
    }
}
