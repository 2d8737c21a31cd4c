//! Scripted [`DrugsApi`] implementation for controller tests.
//!
//! Typed payloads (scan results, history rows, profiles, login
//! outcomes) are queued and consumed in order; once a queue runs dry
//! the mock answers with an empty default. Any operation can be forced
//! to fail by name. Every call is recorded so tests can assert what
//! reached the backend and in what order.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::endpoints::auth::{AuthSession, LoginOutcome, TwoFactorSetup};
use super::error::ApiError;
use super::DrugsApi;
use crate::models::{HistoryEntry, Notification, ScanResult, TagKind, UserProfile};

#[derive(Default)]
pub struct MockApi {
    scans: Mutex<VecDeque<ScanResult>>,
    history: Mutex<VecDeque<Vec<HistoryEntry>>>,
    profiles: Mutex<VecDeque<UserProfile>>,
    notifications: Mutex<VecDeque<Vec<Notification>>>,
    logins: Mutex<VecDeque<LoginOutcome>>,
    sessions: Mutex<VecDeque<AuthSession>>,
    setups: Mutex<VecDeque<TwoFactorSetup>>,
    failures: Mutex<HashMap<String, ApiError>>,
    calls: Mutex<Vec<String>>,
    tag_updates: Mutex<Vec<(TagKind, Vec<String>)>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Scripting ────────────────────────────────────────────

    pub fn with_scan(self, result: ScanResult) -> Self {
        self.scans.lock().unwrap().push_back(result);
        self
    }

    pub fn with_history(self, rows: Vec<HistoryEntry>) -> Self {
        self.history.lock().unwrap().push_back(rows);
        self
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.profiles.lock().unwrap().push_back(profile);
        self
    }

    pub fn with_notifications(self, rows: Vec<Notification>) -> Self {
        self.notifications.lock().unwrap().push_back(rows);
        self
    }

    pub fn with_login(self, outcome: LoginOutcome) -> Self {
        self.logins.lock().unwrap().push_back(outcome);
        self
    }

    pub fn with_2fa_session(self, session: AuthSession) -> Self {
        self.sessions.lock().unwrap().push_back(session);
        self
    }

    pub fn with_2fa_setup(self, setup: TwoFactorSetup) -> Self {
        self.setups.lock().unwrap().push_back(setup);
        self
    }

    /// Make the named operation fail. `op` is the trait method name,
    /// e.g. `"delete_scan"`. The failure is sticky until replaced.
    pub fn failing(self, op: &str, error: ApiError) -> Self {
        self.failures.lock().unwrap().insert(op.to_string(), error);
        self
    }

    // ── Inspection ───────────────────────────────────────────

    /// Operation names in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Every whole-list tag replacement that reached the mock.
    pub fn tag_updates(&self) -> Vec<(TagKind, Vec<String>)> {
        self.tag_updates.lock().unwrap().clone()
    }

    // ── Internals ────────────────────────────────────────────

    fn record(&self, op: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(op.to_string());
        match self.failures.lock().unwrap().get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn pop<T>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
        queue.lock().unwrap().pop_front()
    }
}

impl DrugsApi for MockApi {
    fn scan_names(&self, names: &[String]) -> Result<ScanResult, ApiError> {
        self.record("scan_names")?;
        let _ = names;
        Ok(Self::pop(&self.scans).unwrap_or_default())
    }

    fn scan_images(&self, paths: &[PathBuf]) -> Result<ScanResult, ApiError> {
        self.record("scan_images")?;
        let _ = paths;
        Ok(Self::pop(&self.scans).unwrap_or_default())
    }

    fn fetch_history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        self.record("fetch_history")?;
        Ok(Self::pop(&self.history).unwrap_or_default())
    }

    fn delete_scan(&self, _scan_id: i64) -> Result<(), ApiError> {
        self.record("delete_scan")
    }

    fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.record("fetch_profile")?;
        Ok(Self::pop(&self.profiles).unwrap_or_default())
    }

    fn replace_tags(&self, kind: TagKind, values: &[String]) -> Result<(), ApiError> {
        self.record("replace_tags")?;
        self.tag_updates
            .lock()
            .unwrap()
            .push((kind, values.to_vec()));
        Ok(())
    }

    fn upload_avatar(&self, _path: &Path) -> Result<(), ApiError> {
        self.record("upload_avatar")
    }

    fn clear_history(&self) -> Result<(), ApiError> {
        self.record("clear_history")
    }

    fn delete_account(&self) -> Result<(), ApiError> {
        self.record("delete_account")
    }

    fn fetch_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.record("fetch_notifications")?;
        Ok(Self::pop(&self.notifications).unwrap_or_default())
    }

    fn mark_notifications_read(&self) -> Result<(), ApiError> {
        self.record("mark_notifications_read")
    }

    fn login(&self, _username: &str, _password: &str) -> Result<LoginOutcome, ApiError> {
        self.record("login")?;
        Ok(Self::pop(&self.logins).unwrap_or_else(|| {
            LoginOutcome::LoggedIn(AuthSession {
                token: "mock-token".to_string(),
                username: "mock-user".to_string(),
            })
        }))
    }

    fn login_2fa(&self, _username: &str, _code: &str) -> Result<AuthSession, ApiError> {
        self.record("login_2fa")?;
        Ok(Self::pop(&self.sessions).unwrap_or_else(|| AuthSession {
            token: "mock-token".to_string(),
            username: "mock-user".to_string(),
        }))
    }

    fn signup(&self, _username: &str, _email: &str, _password: &str) -> Result<String, ApiError> {
        self.record("signup")?;
        Ok("Account created! Please check your email.".to_string())
    }

    fn verify_email(&self, _token: &str) -> Result<String, ApiError> {
        self.record("verify_email")?;
        Ok("Email verified! You can now login.".to_string())
    }

    fn resend_verification(&self, _email: &str) -> Result<String, ApiError> {
        self.record("resend_verification")?;
        Ok("Verification email resent.".to_string())
    }

    fn change_password(
        &self,
        _old_password: &str,
        _new_password: &str,
        _confirm_new_password: &str,
    ) -> Result<String, ApiError> {
        self.record("change_password")?;
        Ok("Password changed successfully.".to_string())
    }

    fn request_password_reset(&self, _email: &str) -> Result<String, ApiError> {
        self.record("request_password_reset")?;
        Ok("Password reset email sent.".to_string())
    }

    fn confirm_password_reset(
        &self,
        _uidb64: &str,
        _token: &str,
        _new_password: &str,
    ) -> Result<String, ApiError> {
        self.record("confirm_password_reset")?;
        Ok("Password reset successful.".to_string())
    }

    fn setup_2fa(&self) -> Result<TwoFactorSetup, ApiError> {
        self.record("setup_2fa")?;
        Ok(Self::pop(&self.setups).unwrap_or_else(|| TwoFactorSetup {
            qr_code: "data:image/png;base64,iVBORw==".to_string(),
            secret_key: "MOCKSECRET".to_string(),
        }))
    }

    fn verify_2fa(&self, _code: &str) -> Result<String, ApiError> {
        self.record("verify_2fa")?;
        Ok("2FA enabled successfully!".to_string())
    }

    fn disable_2fa(&self) -> Result<String, ApiError> {
        self.record("disable_2fa")?;
        Ok("2FA disabled successfully.".to_string())
    }

    fn send_email_otp(&self) -> Result<String, ApiError> {
        self.record("send_email_otp")?;
        Ok("Code sent to your email.".to_string())
    }

    fn health(&self) -> Result<String, ApiError> {
        self.record("health")?;
        Ok("ok".to_string())
    }
}
