//! Operation wrappers over the backend's HTTP surface.
//!
//! Each module corresponds to one backend route group and holds the
//! request shaping plus response parsing for its operations. The raw
//! HTTP mechanics live in [`crate::api::client`].

pub mod auth;
pub mod health;
pub mod history;
pub mod notifications;
pub mod profile;
pub mod scan;

use serde_json::Value;

/// The `message` field of a 2xx body, or `fallback` when absent.
pub(crate) fn message_or(body: &Value, fallback: &str) -> String {
    body.get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
