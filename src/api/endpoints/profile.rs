//! Profile read and mutation.
//!
//! `GET /api/drugs/auth/profile/`: merged account + profile record.
//! `PUT /api/drugs/auth/profile/`: whole-list tag replacement (JSON) or
//! avatar upload (multipart, part name `avatar`).
//! `DELETE /api/drugs/auth/profile/`: delete the account;
//! `?target=history` clears scan history instead.

use std::path::Path;

use reqwest::blocking::multipart::Form;
use serde_json::json;

use crate::api::client::{file_part, ApiClient, Auth};
use crate::api::error::ApiError;
use crate::models::{TagKind, UserProfile};

const PROFILE_PATH: &str = "/api/drugs/auth/profile/";

impl ApiClient {
    pub fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        let body = self.get(PROFILE_PATH, Auth::IfPresent, "Failed to fetch profile")?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode {
            detail: format!("profile: {e}"),
        })
    }

    /// Replace one tag list wholesale. The caller computes the full new
    /// list locally; there is no partial-patch protocol.
    pub fn replace_tags(&self, kind: TagKind, values: &[String]) -> Result<(), ApiError> {
        let body = json!({ kind.field_name(): values });
        self.put_json(PROFILE_PATH, &body, Auth::IfPresent, "Failed to update profile")?;
        tracing::info!(kind = kind.field_name(), count = values.len(), "Tags replaced");
        Ok(())
    }

    /// Upload a new avatar image. Callers reload the profile afterwards
    /// to pick up the served URL.
    pub fn upload_avatar(&self, path: &Path) -> Result<(), ApiError> {
        let form = Form::new().part("avatar", file_part(path)?);
        self.put_multipart(PROFILE_PATH, form, Auth::IfPresent, "Failed to update profile")?;
        tracing::info!("Avatar uploaded");
        Ok(())
    }

    /// Clear the user's entire scan history.
    pub fn clear_history(&self) -> Result<(), ApiError> {
        let path = format!("{PROFILE_PATH}?target=history");
        self.delete(&path, None, Auth::IfPresent, "Failed to clear history")?;
        tracing::info!("Scan history cleared");
        Ok(())
    }

    /// Permanently delete the account and its data.
    pub fn delete_account(&self) -> Result<(), ApiError> {
        self.delete(PROFILE_PATH, None, Auth::IfPresent, "Failed to delete account")?;
        tracing::info!("Account deleted");
        Ok(())
    }
}
