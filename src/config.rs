use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "SafeMeds";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the backend base URL.
pub const API_BASE_ENV: &str = "SAFEMEDS_API_URL";

/// Default backend location for local development.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Backend base URL: `SAFEMEDS_API_URL` if set, local default otherwise.
pub fn api_base_url() -> String {
    base_url_or_default(std::env::var(API_BASE_ENV).ok())
}

fn base_url_or_default(var: Option<String>) -> String {
    match var {
        Some(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_API_BASE.to_string(),
    }
}

/// Get the application data directory
/// ~/.safemeds/ on all platforms (hidden; holds only client-side state)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(".safemeds")
}

/// Path of the persisted session file (token + username).
pub fn session_file_path() -> PathBuf {
    app_data_dir().join("session.json")
}

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "safemeds=info"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with(".safemeds"));
    }

    #[test]
    fn session_file_under_app_data() {
        let session = session_file_path();
        assert!(session.starts_with(app_data_dir()));
        assert!(session.ends_with("session.json"));
    }

    #[test]
    fn app_name_is_safemeds() {
        assert_eq!(APP_NAME, "SafeMeds");
    }

    #[test]
    fn base_url_falls_back_to_default() {
        assert_eq!(base_url_or_default(None), DEFAULT_API_BASE);
        assert_eq!(base_url_or_default(Some(String::new())), DEFAULT_API_BASE);
        assert_eq!(base_url_or_default(Some("   ".into())), DEFAULT_API_BASE);
    }

    #[test]
    fn base_url_respects_override() {
        let url = base_url_or_default(Some("https://api.safemeds.app".into()));
        assert_eq!(url, "https://api.safemeds.app");
    }
}
