//! History screen: list saved scans, delete rows, reopen a result.
//!
//! Key properties:
//! - Loading is gated on a live session; logged-out users get the
//!   login prompt without a request going out.
//! - Row deletion is optimistic. The row disappears immediately and
//!   comes back if the backend refuses.
//! - Reopening runs the stored payload through the same normalization
//!   as a live scan response, so rows saved under older backend shapes
//!   still render.

use std::sync::Arc;

use super::check::CheckSeed;
use super::{Confirm, Phase};
use crate::api::{ApiError, DrugsApi};
use crate::models::HistoryEntry;
use crate::normalize;
use crate::session_store::SessionStore;

/// Shown instead of the list when no session is active.
pub const LOGIN_REQUIRED: &str = "You must be logged in to view this page.";

/// Shown when the history fetch fails, whatever the cause.
pub const FETCH_FAILED: &str = "Could not fetch history. Please try again later.";

pub struct HistoryController {
    api: Arc<dyn DrugsApi>,
    session: Arc<SessionStore>,
    phase: Phase<Vec<HistoryEntry>>,
    generation: u64,
}

impl HistoryController {
    pub fn new(api: Arc<dyn DrugsApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    /// Fetch the saved scans, newest first as the backend returns them.
    pub fn load(&mut self) {
        if !self.session.is_authenticated() {
            self.phase = Phase::Failure(LOGIN_REQUIRED.to_string());
            return;
        }
        let generation = self.begin();
        let outcome = self.api.fetch_history();
        self.finish(generation, outcome);
    }

    /// Delete one saved scan. The row is removed locally first and
    /// restored if the request fails.
    pub fn delete(&mut self, scan_id: i64, confirm: Confirm) -> Result<(), String> {
        if !confirm.is_confirmed() {
            return Ok(());
        }
        let Some(rows) = self.phase.value_mut() else {
            return Ok(());
        };
        let snapshot = rows.clone();
        rows.retain(|row| row.id != scan_id);
        if let Err(e) = self.api.delete_scan(scan_id) {
            tracing::warn!(scan_id, error = %e, "Delete failed, restoring row");
            self.phase = Phase::Success(snapshot);
            return Err(format!("Failed to delete: {e}"));
        }
        tracing::info!(scan_id, "Scan deleted");
        Ok(())
    }

    /// Hand a saved row back to the check screen. The stored payload is
    /// normalized here so the caller sees the canonical result shape.
    pub fn reopen(&self, scan_id: i64) -> Option<CheckSeed> {
        let rows = self.phase.value()?;
        let row = rows.iter().find(|row| row.id == scan_id)?;
        Some(CheckSeed {
            result: normalize::scan_result(&row.scan_results),
            scanned_at: Some(row.created_at),
        })
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
    }

    // ── Reads ────────────────────────────────────────────────

    pub fn rows(&self) -> Option<&[HistoryEntry]> {
        self.phase.value().map(Vec::as_slice)
    }

    pub fn error(&self) -> Option<&str> {
        self.phase.error()
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    // ── Request bookkeeping ──────────────────────────────────

    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.generation
    }

    fn finish(&mut self, generation: u64, outcome: Result<Vec<HistoryEntry>, ApiError>) {
        if generation != self.generation {
            tracing::debug!("Discarding stale history completion");
            return;
        }
        self.phase = match outcome {
            Ok(rows) => {
                tracing::debug!(rows = rows.len(), "History loaded");
                Phase::Success(rows)
            }
            Err(e) => {
                tracing::warn!(error = %e, "History fetch failed");
                Phase::Failure(FETCH_FAILED.to_string())
            }
        };
    }
}
