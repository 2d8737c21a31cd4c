//! Account lifecycle operations.
//!
//! `POST /api/drugs/auth/login/`: password step; may demand a 2FA code
//! `POST /api/drugs/auth/2fa/login/`: complete a 2FA login
//! `POST /api/drugs/auth/signup/`: create an account (email-verified)
//! `POST /api/drugs/auth/verify-email/`: consume a verification token
//! `POST /api/drugs/auth/resend-verification/`: resend the link
//! `POST /api/drugs/auth/change-password/`: change while logged in
//! `POST /api/drugs/auth/password-reset-request/` + `/password-reset-confirm/`
//! `GET/POST /api/drugs/auth/2fa/{setup,verify,disable,email}/`
//!
//! These return parsed outcomes; storing or clearing the session is the
//! auth controller's job.

use base64::Engine as _;
use serde_json::{json, Value};

use super::message_or;
use crate::api::client::{ApiClient, Auth};
use crate::api::error::ApiError;

/// Credentials handed back by a completed login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub username: String,
}

/// What the password step of login produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn(AuthSession),
    /// Password accepted, but the account is 2FA-enrolled; a code is
    /// needed to finish.
    TwoFactorRequired,
}

/// Enrollment material returned by 2FA setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoFactorSetup {
    /// `data:image/png;base64,` URL of the provisioning QR code.
    pub qr_code: String,
    /// The shared secret, for manual authenticator entry.
    pub secret_key: String,
}

impl TwoFactorSetup {
    /// The QR code as raw PNG bytes, for shells that render images
    /// rather than data URLs.
    pub fn qr_png_bytes(&self) -> Result<Vec<u8>, ApiError> {
        let payload = self
            .qr_code
            .strip_prefix("data:image/png;base64,")
            .unwrap_or(&self.qr_code);
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ApiError::Decode {
                detail: format!("qr code: {e}"),
            })
    }
}

impl ApiClient {
    /// Password step. Carries the stored token if one exists, matching
    /// the original client's shared header helper.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let body = json!({ "username": username, "password": password });
        let response = self.post_json(
            "/api/drugs/auth/login/",
            &body,
            Auth::IfPresent,
            "Login failed",
        )?;
        parse_login(&response)
    }

    /// Second step for 2FA-enrolled accounts.
    pub fn login_2fa(&self, username: &str, code: &str) -> Result<AuthSession, ApiError> {
        let body = json!({ "username": username, "code": code });
        let response = self.post_json(
            "/api/drugs/auth/2fa/login/",
            &body,
            Auth::Anonymous,
            "Invalid 2FA code",
        )?;
        parse_session(&response, "2FA login response missing token")
    }

    /// Create an account. The backend emails a verification link; the
    /// returned message tells the user to check their inbox.
    pub fn signup(&self, username: &str, email: &str, password: &str) -> Result<String, ApiError> {
        let body = json!({ "username": username, "email": email, "password": password });
        let response = self.post_json(
            "/api/drugs/auth/signup/",
            &body,
            Auth::IfPresent,
            "Signup failed",
        )?;
        Ok(message_or(
            &response,
            "Account created! Please check your email.",
        ))
    }

    /// Consume an emailed verification token.
    pub fn verify_email(&self, token: &str) -> Result<String, ApiError> {
        let body = json!({ "token": token });
        let response = self.post_json(
            "/api/drugs/auth/verify-email/",
            &body,
            Auth::Anonymous,
            "Verification link is invalid or expired.",
        )?;
        Ok(message_or(&response, "Email verified successfully!"))
    }

    pub fn resend_verification(&self, email: &str) -> Result<String, ApiError> {
        let body = json!({ "email": email });
        let response = self.post_json(
            "/api/drugs/auth/resend-verification/",
            &body,
            Auth::Anonymous,
            "Failed to resend email",
        )?;
        Ok(message_or(&response, "Verification email resent."))
    }

    pub fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirm_new_password: &str,
    ) -> Result<String, ApiError> {
        let body = json!({
            "old_password": old_password,
            "new_password": new_password,
            "confirm_new_password": confirm_new_password,
        });
        let response = self.post_json(
            "/api/drugs/auth/change-password/",
            &body,
            Auth::IfPresent,
            "Failed to change password.",
        )?;
        Ok(message_or(&response, "Password changed successfully."))
    }

    pub fn request_password_reset(&self, email: &str) -> Result<String, ApiError> {
        let body = json!({ "email": email });
        let response = self.post_json(
            "/api/drugs/auth/password-reset-request/",
            &body,
            Auth::Anonymous,
            "An error occurred. Please try again.",
        )?;
        Ok(message_or(&response, ""))
    }

    pub fn confirm_password_reset(
        &self,
        uidb64: &str,
        token: &str,
        new_password: &str,
    ) -> Result<String, ApiError> {
        let body = json!({ "uidb64": uidb64, "token": token, "new_password": new_password });
        let response = self.post_json(
            "/api/drugs/auth/password-reset-confirm/",
            &body,
            Auth::Anonymous,
            "Failed to reset password.",
        )?;
        Ok(message_or(&response, ""))
    }

    /// Begin 2FA enrollment: the backend mints a TOTP device and returns
    /// its provisioning QR code and secret.
    pub fn setup_2fa(&self) -> Result<TwoFactorSetup, ApiError> {
        let response = self.get("/api/drugs/auth/2fa/setup/", Auth::IfPresent, "Failed to setup 2FA")?;

        let qr_code = response
            .get("qr_code")
            .and_then(|q| q.as_str())
            .ok_or_else(|| ApiError::Decode {
                detail: "2FA setup response missing qr_code".to_string(),
            })?
            .to_string();
        let secret_key = response
            .get("secret_key")
            .and_then(|s| s.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(TwoFactorSetup { qr_code, secret_key })
    }

    /// Prove the authenticator was enrolled by submitting a first code.
    pub fn verify_2fa(&self, code: &str) -> Result<String, ApiError> {
        let body = json!({ "code": code });
        let response = self.post_json(
            "/api/drugs/auth/2fa/verify/",
            &body,
            Auth::IfPresent,
            "Invalid code",
        )?;
        Ok(message_or(&response, "2FA enabled successfully!"))
    }

    pub fn disable_2fa(&self) -> Result<String, ApiError> {
        let response = self.post_empty(
            "/api/drugs/auth/2fa/disable/",
            Auth::IfPresent,
            "Failed to disable 2FA",
        )?;
        Ok(message_or(&response, "2FA disabled successfully."))
    }

    /// Ask the backend to email a one-time login code.
    pub fn send_email_otp(&self) -> Result<String, ApiError> {
        let response = self.post_empty(
            "/api/drugs/auth/2fa/email/",
            Auth::IfPresent,
            "Failed to send email code",
        )?;
        Ok(message_or(&response, "Code sent to your email."))
    }
}

fn parse_login(body: &Value) -> Result<LoginOutcome, ApiError> {
    if body.get("requires_2fa").and_then(|r| r.as_bool()) == Some(true) {
        return Ok(LoginOutcome::TwoFactorRequired);
    }
    parse_session(body, "login response missing token").map(LoginOutcome::LoggedIn)
}

fn parse_session(body: &Value, missing: &str) -> Result<AuthSession, ApiError> {
    let token = body.get("token").and_then(|t| t.as_str());
    let username = body.get("username").and_then(|u| u.as_str());

    match (token, username) {
        (Some(token), Some(username)) => Ok(AuthSession {
            token: token.to_string(),
            username: username.to_string(),
        }),
        _ => Err(ApiError::Decode {
            detail: missing.to_string(),
        }),
    }
}
