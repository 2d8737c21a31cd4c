//! Backend transport surface.
//!
//! [`client::ApiClient`] speaks HTTP to the SafeMeds backend; the
//! endpoint modules under [`endpoints`] shape requests and parse
//! responses per operation. [`DrugsApi`] abstracts the whole surface so
//! controllers can run against [`mock::MockApi`] in tests.

use std::path::{Path, PathBuf};

pub mod client;
pub mod endpoints;
pub mod error;
pub mod mock;

pub use client::{ApiClient, Auth};
pub use endpoints::auth::{AuthSession, LoginOutcome, TwoFactorSetup};
pub use error::ApiError;
pub use mock::MockApi;

use crate::models::{HistoryEntry, Notification, ScanResult, TagKind, UserProfile};

/// Every operation the backend offers, as consumed by the controllers.
///
/// `ApiClient` is the production implementation; `MockApi` scripts
/// canned outcomes for tests.
pub trait DrugsApi: Send + Sync {
    // ── Scanning ─────────────────────────────────────────────
    fn scan_names(&self, names: &[String]) -> Result<ScanResult, ApiError>;
    fn scan_images(&self, paths: &[PathBuf]) -> Result<ScanResult, ApiError>;

    // ── History ──────────────────────────────────────────────
    fn fetch_history(&self) -> Result<Vec<HistoryEntry>, ApiError>;
    fn delete_scan(&self, scan_id: i64) -> Result<(), ApiError>;

    // ── Profile & notifications ──────────────────────────────
    fn fetch_profile(&self) -> Result<UserProfile, ApiError>;
    fn replace_tags(&self, kind: TagKind, values: &[String]) -> Result<(), ApiError>;
    fn upload_avatar(&self, path: &Path) -> Result<(), ApiError>;
    fn clear_history(&self) -> Result<(), ApiError>;
    fn delete_account(&self) -> Result<(), ApiError>;
    fn fetch_notifications(&self) -> Result<Vec<Notification>, ApiError>;
    fn mark_notifications_read(&self) -> Result<(), ApiError>;

    // ── Account lifecycle ────────────────────────────────────
    fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ApiError>;
    fn login_2fa(&self, username: &str, code: &str) -> Result<AuthSession, ApiError>;
    fn signup(&self, username: &str, email: &str, password: &str) -> Result<String, ApiError>;
    fn verify_email(&self, token: &str) -> Result<String, ApiError>;
    fn resend_verification(&self, email: &str) -> Result<String, ApiError>;
    fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirm_new_password: &str,
    ) -> Result<String, ApiError>;
    fn request_password_reset(&self, email: &str) -> Result<String, ApiError>;
    fn confirm_password_reset(
        &self,
        uidb64: &str,
        token: &str,
        new_password: &str,
    ) -> Result<String, ApiError>;
    fn setup_2fa(&self) -> Result<TwoFactorSetup, ApiError>;
    fn verify_2fa(&self, code: &str) -> Result<String, ApiError>;
    fn disable_2fa(&self) -> Result<String, ApiError>;
    fn send_email_otp(&self) -> Result<String, ApiError>;

    // ── Service ──────────────────────────────────────────────
    fn health(&self) -> Result<String, ApiError>;
}

impl DrugsApi for ApiClient {
    fn scan_names(&self, names: &[String]) -> Result<ScanResult, ApiError> {
        ApiClient::scan_names(self, names)
    }

    fn scan_images(&self, paths: &[PathBuf]) -> Result<ScanResult, ApiError> {
        ApiClient::scan_images(self, paths)
    }

    fn fetch_history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        ApiClient::fetch_history(self)
    }

    fn delete_scan(&self, scan_id: i64) -> Result<(), ApiError> {
        ApiClient::delete_scan(self, scan_id)
    }

    fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        ApiClient::fetch_profile(self)
    }

    fn replace_tags(&self, kind: TagKind, values: &[String]) -> Result<(), ApiError> {
        ApiClient::replace_tags(self, kind, values)
    }

    fn upload_avatar(&self, path: &Path) -> Result<(), ApiError> {
        ApiClient::upload_avatar(self, path)
    }

    fn clear_history(&self) -> Result<(), ApiError> {
        ApiClient::clear_history(self)
    }

    fn delete_account(&self) -> Result<(), ApiError> {
        ApiClient::delete_account(self)
    }

    fn fetch_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        ApiClient::fetch_notifications(self)
    }

    fn mark_notifications_read(&self) -> Result<(), ApiError> {
        ApiClient::mark_notifications_read(self)
    }

    fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        ApiClient::login(self, username, password)
    }

    fn login_2fa(&self, username: &str, code: &str) -> Result<AuthSession, ApiError> {
        ApiClient::login_2fa(self, username, code)
    }

    fn signup(&self, username: &str, email: &str, password: &str) -> Result<String, ApiError> {
        ApiClient::signup(self, username, email, password)
    }

    fn verify_email(&self, token: &str) -> Result<String, ApiError> {
        ApiClient::verify_email(self, token)
    }

    fn resend_verification(&self, email: &str) -> Result<String, ApiError> {
        ApiClient::resend_verification(self, email)
    }

    fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirm_new_password: &str,
    ) -> Result<String, ApiError> {
        ApiClient::change_password(self, old_password, new_password, confirm_new_password)
    }

    fn request_password_reset(&self, email: &str) -> Result<String, ApiError> {
        ApiClient::request_password_reset(self, email)
    }

    fn confirm_password_reset(
        &self,
        uidb64: &str,
        token: &str,
        new_password: &str,
    ) -> Result<String, ApiError> {
        ApiClient::confirm_password_reset(self, uidb64, token, new_password)
    }

    fn setup_2fa(&self) -> Result<TwoFactorSetup, ApiError> {
        ApiClient::setup_2fa(self)
    }

    fn verify_2fa(&self, code: &str) -> Result<String, ApiError> {
        ApiClient::verify_2fa(self, code)
    }

    fn disable_2fa(&self) -> Result<String, ApiError> {
        ApiClient::disable_2fa(self)
    }

    fn send_email_otp(&self) -> Result<String, ApiError> {
        ApiClient::send_email_otp(self)
    }

    fn health(&self) -> Result<String, ApiError> {
        ApiClient::health(self)
    }
}
