//! Interaction checking.
//!
//! `POST /api/drugs/scan-and-check/`: one endpoint, two request modes:
//! a comma-joined `drug_names` field for manual entry, or one `images`
//! part per photographed label. The image mode carries the auth header
//! when a session exists so the backend saves the scan to history; the
//! manual mode is anonymous, matching the original client.

use std::path::PathBuf;

use reqwest::blocking::multipart::Form;

use crate::api::client::{file_part, ApiClient, Auth};
use crate::api::error::ApiError;
use crate::models::ScanResult;
use crate::normalize;

const SCAN_PATH: &str = "/api/drugs/scan-and-check/";

impl ApiClient {
    /// Check interactions between manually entered drug names.
    ///
    /// Callers validate the list first; this sends whatever it is given
    /// as one comma-joined field.
    pub fn scan_names(&self, names: &[String]) -> Result<ScanResult, ApiError> {
        let form = Form::new().text("drug_names", names.join(","));
        tracing::info!(count = names.len(), "Submitting drug names for interaction check");

        let body = self.post_multipart(SCAN_PATH, form, Auth::Anonymous, "API request failed")?;
        Ok(normalize::scan_result(&body))
    }

    /// Check interactions from photographed medication labels.
    pub fn scan_images(&self, paths: &[PathBuf]) -> Result<ScanResult, ApiError> {
        let mut form = Form::new();
        for path in paths {
            form = form.part("images", file_part(path)?);
        }
        tracing::info!(count = paths.len(), "Submitting label images for analysis");

        let body = self.post_multipart(SCAN_PATH, form, Auth::IfPresent, "Image analysis failed")?;
        Ok(normalize::scan_result(&body))
    }
}
