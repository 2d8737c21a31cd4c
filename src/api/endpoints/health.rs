//! Backend liveness check.
//!
//! `GET /api/health/`: anonymous; answers `{status}`.

use serde_json::Value;

use crate::api::client::{ApiClient, Auth};
use crate::api::error::ApiError;

impl ApiClient {
    /// Ping the backend. Returns the reported status string.
    pub fn health(&self) -> Result<String, ApiError> {
        let body = self.get("/api/health/", Auth::Anonymous, "Health check failed")?;
        Ok(status_of(&body))
    }
}

fn status_of(body: &Value) -> String {
    body.get("status")
        .and_then(|s| s.as_str())
        .unwrap_or("ok")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_field_is_reported() {
        assert_eq!(status_of(&json!({"status": "degraded"})), "degraded");
    }

    #[test]
    fn missing_status_defaults_to_ok() {
        assert_eq!(status_of(&json!({})), "ok");
    }
}
