//! Account flows: login (with optional 2FA step), signup, email
//! verification, password reset, and the account-security settings.
//!
//! Unlike the data screens this controller keeps no loading phase; each
//! flow is a single call whose outcome the shell reacts to directly. A
//! login that answers "code required" parks the username in the session
//! store so the code screen can finish the login after a restart.
//!
//! Key properties:
//! - Password strength and password-confirmation checks run before any
//!   request goes out.
//! - Email verification fires exactly once per controller, however
//!   often the shell re-renders the landing screen.
//! - Backend messages pass through verbatim when present; blank ones
//!   fall back to a flow-specific message.

use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;

use crate::api::{ApiError, AuthSession, DrugsApi, LoginOutcome, TwoFactorSetup};
use crate::session_store::SessionStore;

pub const LOGIN_FALLBACK: &str = "Failed to login. Please check your credentials.";
pub const SIGNUP_FALLBACK: &str = "Failed to sign up.";
pub const PASSWORD_CRITERIA: &str = "Please ensure your password meets all criteria.";
pub const SESSION_EXPIRED: &str = "Session expired. Please login again.";
pub const TWO_FA_LOGIN_FAILED: &str = "Login failed after 2FA.";
pub const INVALID_CODE_FALLBACK: &str = "Invalid code.";
pub const MISSING_VERIFY_TOKEN: &str = "No verification token found in the link.";
pub const VERIFY_NETWORK_ERROR: &str = "Network error. Please try again.";
pub const RESEND_SENT: &str = "Email sent successfully!";
pub const RESET_REQUEST_FAILED: &str = "An error occurred. Please try again.";
pub const PASSWORDS_MISMATCH: &str = "Passwords do not match.";
pub const RESET_LINK_INVALID: &str = "This password reset link is invalid or has expired.";

static HAS_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());
static HAS_UPPERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").unwrap());

/// Signup password policy: at least 8 characters with a digit and an
/// uppercase letter. The backend enforces the same rules; checking here
/// saves a round trip.
pub fn password_meets_criteria(password: &str) -> bool {
    password.len() >= 8 && HAS_DIGIT.is_match(password) && HAS_UPPERCASE.is_match(password)
}

/// What the shell should do after a login attempt succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStep {
    /// Session stored; go to the app.
    Complete,
    /// Account has 2FA; show the code screen.
    CodeRequired,
}

pub struct AuthController {
    api: Arc<dyn DrugsApi>,
    session: Arc<SessionStore>,
    pending_verification_email: Option<String>,
    verify_outcome: Option<Result<String, String>>,
}

impl AuthController {
    pub fn new(api: Arc<dyn DrugsApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            pending_verification_email: None,
            verify_outcome: None,
        }
    }

    // ── Login ────────────────────────────────────────────────

    pub fn login(&self, username: &str, password: &str) -> Result<LoginStep, String> {
        match self.api.login(username, password) {
            Ok(LoginOutcome::LoggedIn(auth)) => {
                self.store_session(&auth)?;
                tracing::info!(username = %auth.username, "Logged in");
                Ok(LoginStep::Complete)
            }
            Ok(LoginOutcome::TwoFactorRequired) => {
                self.session
                    .remember_pending_2fa(username)
                    .map_err(|e| e.to_string())?;
                tracing::info!(username, "Login needs 2FA code");
                Ok(LoginStep::CodeRequired)
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "Login failed");
                Err(non_empty_or(e.to_string(), LOGIN_FALLBACK))
            }
        }
    }

    /// Finish a login the backend answered with "code required". The
    /// username comes from the session store, so this works even after
    /// the app restarted in between.
    pub fn complete_2fa_login(&self, code: &str) -> Result<(), String> {
        let Some(username) = self.session.pending_2fa_user() else {
            return Err(SESSION_EXPIRED.to_string());
        };
        match self.api.login_2fa(&username, code) {
            Ok(auth) => {
                self.store_session(&auth)?;
                if let Err(e) = self.session.clear_pending_2fa() {
                    tracing::warn!(error = %e, "Could not clear parked 2FA username");
                }
                tracing::info!(username = %auth.username, "2FA login complete");
                Ok(())
            }
            Err(ApiError::Decode { .. }) => Err(TWO_FA_LOGIN_FAILED.to_string()),
            Err(e) => Err(non_empty_or(e.to_string(), INVALID_CODE_FALLBACK)),
        }
    }

    pub fn logout(&self) {
        if let Err(e) = self.session.logout() {
            tracing::warn!(error = %e, "Logout could not clear the session file");
        }
    }

    fn store_session(&self, auth: &AuthSession) -> Result<(), String> {
        self.session
            .login(&auth.token, &auth.username)
            .map_err(|e| e.to_string())
    }

    // ── Signup & verification ────────────────────────────────

    /// Create an account. On success the email is kept so the pending
    /// screen can offer "resend".
    pub fn signup(&mut self, username: &str, email: &str, password: &str) -> Result<String, String> {
        if !password_meets_criteria(password) {
            return Err(PASSWORD_CRITERIA.to_string());
        }
        match self.api.signup(username, email, password) {
            Ok(message) => {
                self.pending_verification_email = Some(email.to_string());
                tracing::info!(username, "Signup accepted, verification pending");
                Ok(message)
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "Signup failed");
                Err(non_empty_or(e.to_string(), SIGNUP_FALLBACK))
            }
        }
    }

    /// Resend the verification email from the post-signup screen.
    /// `None` when no signup happened in this controller.
    pub fn resend_verification(&self) -> Option<String> {
        let email = self.pending_verification_email.as_deref()?;
        Some(match self.api.resend_verification(email) {
            Ok(_) => RESEND_SENT.to_string(),
            Err(e) => format!("Error: {e}"),
        })
    }

    /// Consume a verification link. The first call decides; repeats
    /// return the cached outcome so a re-rendered screen cannot burn
    /// the single-use token twice.
    pub fn verify_email(&mut self, token: Option<&str>) -> Result<String, String> {
        if let Some(outcome) = &self.verify_outcome {
            return outcome.clone();
        }
        let outcome = match non_empty(token) {
            None => Err(MISSING_VERIFY_TOKEN.to_string()),
            Some(token) => match self.api.verify_email(token) {
                Ok(message) => Ok(message),
                Err(e @ (ApiError::Network { .. } | ApiError::Decode { .. })) => {
                    tracing::warn!(error = %e, "Verification request did not complete");
                    Err(VERIFY_NETWORK_ERROR.to_string())
                }
                Err(e) => Err(e.to_string()),
            },
        };
        self.verify_outcome = Some(outcome.clone());
        outcome
    }

    // ── Password reset ───────────────────────────────────────

    /// Ask for a reset email. Always returns a message to show; the
    /// backend deliberately answers the same for unknown addresses.
    pub fn request_password_reset(&self, email: &str) -> String {
        match self.api.request_password_reset(email) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "Password reset request failed");
                RESET_REQUEST_FAILED.to_string()
            }
        }
    }

    /// Set a new password from a reset link. The link pieces and the
    /// confirmation are checked before the request goes out.
    pub fn confirm_password_reset(
        &self,
        uidb64: Option<&str>,
        token: Option<&str>,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<String, String> {
        let (Some(uidb64), Some(token)) = (non_empty(uidb64), non_empty(token)) else {
            return Err(RESET_LINK_INVALID.to_string());
        };
        if new_password != confirm_password {
            return Err(PASSWORDS_MISMATCH.to_string());
        }
        self.api
            .confirm_password_reset(uidb64, token, new_password)
            .map_err(|e| e.to_string())
    }

    // ── Security settings ────────────────────────────────────

    pub fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirm_new_password: &str,
    ) -> Result<String, String> {
        self.api
            .change_password(old_password, new_password, confirm_new_password)
            .map_err(|e| e.to_string())
    }

    /// Begin enrolment; the result carries the QR code and manual key.
    pub fn setup_2fa(&self) -> Result<TwoFactorSetup, String> {
        self.api.setup_2fa().map_err(|e| e.to_string())
    }

    /// Confirm enrolment with a code from the authenticator app.
    pub fn enable_2fa(&self, code: &str) -> Result<String, String> {
        self.api.verify_2fa(code).map_err(|e| e.to_string())
    }

    pub fn disable_2fa(&self) -> Result<String, String> {
        self.api.disable_2fa().map_err(|e| e.to_string())
    }

    /// Email a fallback one-time code for users without their app.
    pub fn send_email_otp(&self) -> Result<String, String> {
        self.api.send_email_otp().map_err(|e| e.to_string())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Backend messages can arrive blank; substitute the flow's fallback.
fn non_empty_or(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApi;

    fn harness(mock: MockApi) -> (Arc<MockApi>, Arc<SessionStore>, AuthController) {
        let mock = Arc::new(mock);
        let session = Arc::new(SessionStore::in_memory());
        let controller = AuthController::new(mock.clone(), session.clone());
        (mock, session, controller)
    }

    #[test]
    fn login_stores_the_session() {
        let (_, session, controller) = harness(MockApi::new().with_login(LoginOutcome::LoggedIn(
            AuthSession {
                token: "token-9".into(),
                username: "alice".into(),
            },
        )));

        assert_eq!(controller.login("alice", "pw"), Ok(LoginStep::Complete));
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("token-9"));
    }

    #[test]
    fn two_factor_login_parks_the_username() {
        let (mock, session, controller) =
            harness(MockApi::new().with_login(LoginOutcome::TwoFactorRequired));

        assert_eq!(controller.login("alice", "pw"), Ok(LoginStep::CodeRequired));
        assert!(!session.is_authenticated());
        assert_eq!(session.pending_2fa_user().as_deref(), Some("alice"));
        assert_eq!(mock.calls(), vec!["login"]);
    }

    #[test]
    fn login_failure_passes_the_backend_message_through() {
        let (_, _, controller) = harness(MockApi::new().failing(
            "login",
            ApiError::Backend {
                status: 401,
                message: "No active account found.".into(),
            },
        ));

        assert_eq!(
            controller.login("alice", "pw"),
            Err("No active account found.".to_string())
        );
    }

    #[test]
    fn blank_backend_message_falls_back() {
        let (_, _, controller) = harness(MockApi::new().failing(
            "login",
            ApiError::Backend {
                status: 401,
                message: String::new(),
            },
        ));

        assert_eq!(
            controller.login("alice", "pw"),
            Err(LOGIN_FALLBACK.to_string())
        );
    }

    #[test]
    fn code_entry_without_a_parked_username_is_session_expired() {
        let (mock, _, controller) = harness(MockApi::new());

        assert_eq!(
            controller.complete_2fa_login("123456"),
            Err(SESSION_EXPIRED.to_string())
        );
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn code_entry_finishes_the_login_and_clears_the_parked_name() {
        let (_, session, controller) = harness(
            MockApi::new()
                .with_login(LoginOutcome::TwoFactorRequired)
                .with_2fa_session(AuthSession {
                    token: "token-2fa".into(),
                    username: "alice".into(),
                }),
        );
        controller.login("alice", "pw").unwrap();

        assert_eq!(controller.complete_2fa_login("123456"), Ok(()));
        assert!(session.is_authenticated());
        assert!(session.pending_2fa_user().is_none());
    }

    #[test]
    fn malformed_code_response_has_its_own_message() {
        let (_, session, controller) = harness(MockApi::new().failing(
            "login_2fa",
            ApiError::Decode {
                detail: "missing token".into(),
            },
        ));
        session.remember_pending_2fa("alice").unwrap();

        assert_eq!(
            controller.complete_2fa_login("123456"),
            Err(TWO_FA_LOGIN_FAILED.to_string())
        );
    }

    #[test]
    fn password_criteria_cover_length_digit_and_uppercase() {
        assert!(!password_meets_criteria("abc"));
        assert!(!password_meets_criteria("abcdefgh1"));
        assert!(!password_meets_criteria("Abcdefghi"));
        assert!(password_meets_criteria("Abcdefg1"));
    }

    #[test]
    fn weak_password_is_rejected_before_any_request() {
        let (mock, _, mut controller) = harness(MockApi::new());

        assert_eq!(
            controller.signup("alice", "alice@example.com", "weak"),
            Err(PASSWORD_CRITERIA.to_string())
        );
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn signup_remembers_the_email_for_resend() {
        let (mock, _, mut controller) = harness(MockApi::new());

        let message = controller
            .signup("alice", "alice@example.com", "Abcdefg1")
            .unwrap();
        assert_eq!(message, "Account created! Please check your email.");

        assert_eq!(
            controller.resend_verification(),
            Some(RESEND_SENT.to_string())
        );
        assert_eq!(mock.calls(), vec!["signup", "resend_verification"]);
    }

    #[test]
    fn resend_without_a_signup_is_none() {
        let (mock, _, controller) = harness(MockApi::new());

        assert_eq!(controller.resend_verification(), None);
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn resend_failure_prefixes_the_error() {
        let (_, _, mut controller) = harness(MockApi::new().failing(
            "resend_verification",
            ApiError::Backend {
                status: 500,
                message: "SMTP down".into(),
            },
        ));
        controller
            .signup("alice", "alice@example.com", "Abcdefg1")
            .unwrap();

        assert_eq!(
            controller.resend_verification(),
            Some("Error: SMTP down".to_string())
        );
    }

    #[test]
    fn verification_fires_exactly_once() {
        let (mock, _, mut controller) = harness(MockApi::new());

        let first = controller.verify_email(Some("tok"));
        let second = controller.verify_email(Some("tok"));

        assert_eq!(first, Ok("Email verified! You can now login.".to_string()));
        assert_eq!(second, first);
        assert_eq!(mock.calls(), vec!["verify_email"]);
    }

    #[test]
    fn missing_verification_token_is_rejected_locally() {
        let (mock, _, mut controller) = harness(MockApi::new());

        assert_eq!(
            controller.verify_email(None),
            Err(MISSING_VERIFY_TOKEN.to_string())
        );
        assert_eq!(
            controller.verify_email(Some("")),
            Err(MISSING_VERIFY_TOKEN.to_string())
        );
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn unreachable_verification_gets_the_network_message() {
        let (_, _, mut controller) = harness(MockApi::new().failing(
            "verify_email",
            ApiError::Network {
                detail: "dns".into(),
            },
        ));

        assert_eq!(
            controller.verify_email(Some("tok")),
            Err(VERIFY_NETWORK_ERROR.to_string())
        );
    }

    #[test]
    fn reset_request_failure_flattens_to_a_message() {
        let (_, _, controller) = harness(MockApi::new().failing(
            "request_password_reset",
            ApiError::Network {
                detail: "offline".into(),
            },
        ));

        assert_eq!(
            controller.request_password_reset("alice@example.com"),
            RESET_REQUEST_FAILED
        );
    }

    #[test]
    fn mismatched_passwords_never_reach_the_backend() {
        let (mock, _, controller) = harness(MockApi::new());

        assert_eq!(
            controller.confirm_password_reset(Some("uid"), Some("tok"), "NewPass1", "Different1"),
            Err(PASSWORDS_MISMATCH.to_string())
        );
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn incomplete_reset_link_is_rejected_locally() {
        let (mock, _, controller) = harness(MockApi::new());

        for (uidb64, token) in [(None, Some("tok")), (Some("uid"), None), (Some(""), Some("tok"))]
        {
            assert_eq!(
                controller.confirm_password_reset(uidb64, token, "NewPass1", "NewPass1"),
                Err(RESET_LINK_INVALID.to_string())
            );
        }
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn complete_reset_link_goes_through() {
        let (mock, _, controller) = harness(MockApi::new());

        assert_eq!(
            controller.confirm_password_reset(Some("uid"), Some("tok"), "NewPass1", "NewPass1"),
            Ok("Password reset successful.".to_string())
        );
        assert_eq!(mock.calls(), vec!["confirm_password_reset"]);
    }
}
