//! Blocking HTTP client for the SafeMeds backend.
//!
//! One client instance per process, shared by every endpoint call. The
//! client owns three concerns and nothing else: building the URL from the
//! configured base, attaching the stored token as `Authorization:
//! Token <value>`, and collapsing response outcomes into [`ApiError`].
//! Calls are fire-once: no retries, no caching, no configured timeout.

use std::path::Path;
use std::sync::Arc;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;

use super::error::ApiError;
use crate::config;
use crate::session_store::SessionStore;

/// Whether an operation sends the stored token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Attach `Authorization: Token <value>` when a session exists.
    IfPresent,
    /// Never attach credentials (login, signup, reset, health).
    Anonymous,
}

/// What goes in the request body. JSON and multipart are mutually
/// exclusive by construction.
pub(crate) enum Payload<'a> {
    Empty,
    Json(&'a Value),
    Multipart(Form),
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Client against `base_url`, reading tokens from `session`.
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            session,
        }
    }

    /// Client against the configured backend (`SAFEMEDS_API_URL` or the
    /// local default).
    pub fn from_env(session: Arc<SessionStore>) -> Self {
        Self::new(&config::api_base_url(), session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Verb helpers used by endpoint modules ────────────────

    pub(crate) fn get(&self, path: &str, auth: Auth, fallback: &str) -> Result<Value, ApiError> {
        self.request(Method::GET, path, Payload::Empty, auth, fallback)
    }

    pub(crate) fn post_json(
        &self,
        path: &str,
        body: &Value,
        auth: Auth,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        self.request(Method::POST, path, Payload::Json(body), auth, fallback)
    }

    pub(crate) fn post_empty(
        &self,
        path: &str,
        auth: Auth,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        self.request(Method::POST, path, Payload::Empty, auth, fallback)
    }

    pub(crate) fn put_json(
        &self,
        path: &str,
        body: &Value,
        auth: Auth,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, Payload::Json(body), auth, fallback)
    }

    pub(crate) fn put_empty(
        &self,
        path: &str,
        auth: Auth,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, Payload::Empty, auth, fallback)
    }

    pub(crate) fn delete(
        &self,
        path: &str,
        body: Option<&Value>,
        auth: Auth,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        let payload = match body {
            Some(b) => Payload::Json(b),
            None => Payload::Empty,
        };
        self.request(Method::DELETE, path, payload, auth, fallback)
    }

    pub(crate) fn post_multipart(
        &self,
        path: &str,
        form: Form,
        auth: Auth,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        self.request(Method::POST, path, Payload::Multipart(form), auth, fallback)
    }

    pub(crate) fn put_multipart(
        &self,
        path: &str,
        form: Form,
        auth: Auth,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, Payload::Multipart(form), auth, fallback)
    }

    // ── Core request path ────────────────────────────────────

    fn request(
        &self,
        method: Method,
        path: &str,
        payload: Payload<'_>,
        auth: Auth,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);

        if auth == Auth::IfPresent {
            if let Some(token) = self.session.token() {
                req = req.header(reqwest::header::AUTHORIZATION, token_header(&token));
            }
        }

        req = match payload {
            Payload::Empty => req,
            Payload::Json(body) => req.json(body),
            // The multipart boundary (and content-type) belongs to the HTTP
            // stack; setting a JSON content-type here would corrupt the form.
            Payload::Multipart(form) => req.multipart(form),
        };

        let response = req.send().map_err(|e| {
            let detail = if e.is_connect() {
                format!("connection to {} failed", self.base_url)
            } else if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            };
            tracing::warn!(path, error = %detail, "Request did not reach the backend");
            ApiError::Network { detail }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().ok();
            let message = backend_message(body.as_ref(), fallback);
            tracing::warn!(path, status = status.as_u16(), "Backend rejected request");
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Value>().map_err(|e| ApiError::Decode {
            detail: e.to_string(),
        })
    }
}

/// `Authorization` header value the backend expects.
fn token_header(token: &str) -> String {
    format!("Token {token}")
}

/// Error text for a non-2xx answer: the body's `error` field verbatim
/// when present and a string, the operation's fallback otherwise.
fn backend_message(body: Option<&Value>, fallback: &str) -> String {
    body.and_then(|v| v.get("error"))
        .and_then(|e| e.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Build a named file part with a guessed content type, for image and
/// avatar uploads.
pub(crate) fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = std::fs::read(path).map_err(|e| ApiError::File {
        detail: format!("{}: {e}", path.display()),
    })?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.essence_str())
        .map_err(|e| ApiError::File {
            detail: format!("{}: {e}", path.display()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Arc::new(SessionStore::in_memory()))
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let c = client("http://localhost:8000/");
        assert_eq!(c.base_url(), "http://localhost:8000");
    }

    #[test]
    fn constructor_keeps_clean_base() {
        let c = client("https://api.safemeds.app");
        assert_eq!(c.base_url(), "https://api.safemeds.app");
    }

    #[test]
    fn token_header_format() {
        assert_eq!(token_header("abc123"), "Token abc123");
    }

    #[test]
    fn backend_message_passes_error_field_through() {
        let body = json!({"error": "Invalid username or password"});
        assert_eq!(
            backend_message(Some(&body), "Login failed"),
            "Invalid username or password"
        );
    }

    #[test]
    fn backend_message_falls_back_without_error_field() {
        let body = json!({"detail": "something else"});
        assert_eq!(backend_message(Some(&body), "Login failed"), "Login failed");
    }

    #[test]
    fn backend_message_falls_back_on_non_string_error() {
        let body = json!({"error": {"code": 7}});
        assert_eq!(backend_message(Some(&body), "Scan failed"), "Scan failed");
    }

    #[test]
    fn backend_message_falls_back_without_body() {
        assert_eq!(backend_message(None, "Request failed"), "Request failed");
    }

    #[test]
    fn file_part_missing_file_is_reported() {
        let err = file_part(Path::new("/definitely/not/here.png")).unwrap_err();
        match err {
            ApiError::File { detail } => assert!(detail.contains("here.png")),
            other => panic!("Expected File error, got: {other}"),
        }
    }
}
