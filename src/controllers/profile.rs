//! Profile screen: account details, tag lists, notifications, and the
//! account-level destructive actions.
//!
//! The profile and the notification inbox load together; the screen is
//! not useful with only one of them, so either failure fails the load.
//! Tag edits are optimistic whole-list replacements: the local copy
//! changes first, the full list is pushed, and a failed push reloads
//! the server copy rather than trying to unpick the edit.
//!
//! Key properties:
//! - Profile and notifications are fetched concurrently.
//! - Failed tag saves re-fetch instead of rolling back field by field.
//! - Clearing history and deleting the account require an explicit
//!   confirmation; a cancelled dialog performs no request.

use std::path::Path;
use std::sync::Arc;

use super::{Confirm, Phase};
use crate::api::{ApiError, DrugsApi};
use crate::models::{notification, Notification, TagKind, UserProfile};
use crate::session_store::SessionStore;

pub const LOAD_FAILED: &str = "Failed to load profile data.";
pub const AVATAR_FAILED: &str = "Failed to upload image.";
pub const SAVE_TAG_FAILED: &str = "Failed to save tag.";
pub const DELETE_TAG_FAILED: &str = "Failed to delete tag.";
pub const HISTORY_CLEARED: &str = "History cleared.";
pub const CLEAR_HISTORY_FAILED: &str = "Error clearing history.";
pub const DELETE_ACCOUNT_FAILED: &str = "Failed to delete account.";

/// Everything the profile screen renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileData {
    pub profile: UserProfile,
    pub notifications: Vec<Notification>,
}

pub struct ProfileController {
    api: Arc<dyn DrugsApi>,
    session: Arc<SessionStore>,
    phase: Phase<ProfileData>,
    generation: u64,
}

impl ProfileController {
    pub fn new(api: Arc<dyn DrugsApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    /// Fetch profile and notifications together. The notification fetch
    /// runs on a scoped thread while the profile fetch uses this one.
    pub fn load(&mut self) {
        let generation = self.begin();
        let api = &self.api;
        let outcome = std::thread::scope(|scope| {
            let notifications = scope.spawn(|| api.fetch_notifications());
            let profile = api.fetch_profile();
            let notifications = notifications.join().unwrap_or_else(|_| {
                Err(ApiError::Network {
                    detail: "notification fetch thread panicked".to_string(),
                })
            });
            profile.and_then(|profile| {
                notifications.map(|notifications| ProfileData {
                    profile,
                    notifications,
                })
            })
        });
        self.finish(generation, outcome);
    }

    // ── Tag lists ────────────────────────────────────────────

    /// Append a tag and push the whole updated list. Blank input and
    /// edits before the profile has loaded are ignored.
    pub fn add_tag(&mut self, kind: TagKind, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }
        let Some(data) = self.phase.value_mut() else {
            return Ok(());
        };
        let list = tag_list(&mut data.profile, kind);
        list.push(value.to_string());
        let updated = list.clone();
        self.save_tags(kind, &updated, SAVE_TAG_FAILED)
    }

    /// Remove the tag at `index` and push the remaining list.
    pub fn remove_tag(&mut self, kind: TagKind, index: usize) -> Result<(), String> {
        let Some(data) = self.phase.value_mut() else {
            return Ok(());
        };
        let list = tag_list(&mut data.profile, kind);
        if index >= list.len() {
            return Ok(());
        }
        list.remove(index);
        let updated = list.clone();
        self.save_tags(kind, &updated, DELETE_TAG_FAILED)
    }

    /// Push a full replacement list; on failure, reload the server copy
    /// so the screen never keeps an unsaved edit.
    fn save_tags(&mut self, kind: TagKind, values: &[String], failure: &str) -> Result<(), String> {
        match self.api.replace_tags(kind, values) {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(field = kind.field_name(), error = %e, "Tag save failed, reloading");
                self.load();
                Err(failure.to_string())
            }
        }
    }

    // ── Avatar ───────────────────────────────────────────────

    /// Upload a new avatar, then reload so the fresh URL comes back.
    pub fn upload_avatar(&mut self, path: &Path) -> Result<(), String> {
        match self.api.upload_avatar(path) {
            Ok(()) => {
                self.load();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Avatar upload failed");
                Err(AVATAR_FAILED.to_string())
            }
        }
    }

    // ── Destructive actions ──────────────────────────────────

    /// Wipe the scan history. On success the local scan counter drops
    /// to zero; the shell shows [`HISTORY_CLEARED`].
    pub fn clear_history(&mut self, confirm: Confirm) -> Result<(), String> {
        if !confirm.is_confirmed() {
            return Ok(());
        }
        match self.api.clear_history() {
            Ok(()) => {
                if let Some(data) = self.phase.value_mut() {
                    data.profile.scan_count = 0;
                }
                tracing::info!("History cleared");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Clear history failed");
                Err(CLEAR_HISTORY_FAILED.to_string())
            }
        }
    }

    /// Delete the account server-side, then end the local session.
    pub fn delete_account(&mut self, confirm: Confirm) -> Result<(), String> {
        if !confirm.is_confirmed() {
            return Ok(());
        }
        match self.api.delete_account() {
            Ok(()) => {
                if let Err(e) = self.session.logout() {
                    tracing::warn!(error = %e, "Session cleanup after account deletion failed");
                }
                self.phase = Phase::Idle;
                tracing::info!("Account deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Account deletion failed");
                Err(DELETE_ACCOUNT_FAILED.to_string())
            }
        }
    }

    // ── Notifications ────────────────────────────────────────

    /// Mark the whole inbox read. A failed request only logs; the local
    /// flags stay and the next load resyncs.
    pub fn mark_all_read(&mut self) {
        match self.api.mark_notifications_read() {
            Ok(()) => {
                if let Some(data) = self.phase.value_mut() {
                    for notification in &mut data.notifications {
                        notification.is_read = true;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to mark notifications read");
            }
        }
    }

    pub fn unread_count(&self) -> usize {
        self.phase
            .value()
            .map(|data| notification::unread_count(&data.notifications))
            .unwrap_or(0)
    }

    // ── Reads ────────────────────────────────────────────────

    pub fn data(&self) -> Option<&ProfileData> {
        self.phase.value()
    }

    pub fn error(&self) -> Option<&str> {
        self.phase.error()
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
    }

    // ── Request bookkeeping ──────────────────────────────────

    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.generation
    }

    fn finish(&mut self, generation: u64, outcome: Result<ProfileData, ApiError>) {
        if generation != self.generation {
            tracing::debug!("Discarding stale profile completion");
            return;
        }
        self.phase = match outcome {
            Ok(data) => {
                tracing::debug!(
                    username = %data.profile.username,
                    notifications = data.notifications.len(),
                    "Profile loaded"
                );
                Phase::Success(data)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile load failed");
                Phase::Failure(LOAD_FAILED.to_string())
            }
        };
    }
}

fn tag_list(profile: &mut UserProfile, kind: TagKind) -> &mut Vec<String> {
    match kind {
        TagKind::Allergies => &mut profile.allergies,
        TagKind::Conditions => &mut profile.conditions,
    }
}
