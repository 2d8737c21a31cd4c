//! Auth session store.
//!
//! Single source of truth for "is a user logged in" and "who are they",
//! shared by the transport layer and every screen controller. Token and
//! username live in memory behind an `RwLock` and are mirrored to a JSON
//! file so a restart stays logged in. Hydration is synchronous at
//! construction, so dependent components never see a logged-out flash.
//!
//! Key properties:
//! - Fixed storage keys (`authToken`, `username`, `2fa_user`)
//! - Token bytes zeroed via `Zeroize` when replaced or cleared
//! - No expiry or refresh logic: a token is trusted until the backend
//!   rejects a request; the store itself never observes failures
//! - Written only on explicit login/logout, so readers never race a writer
//!   mid-flow

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::config;

// ═══════════════════════════════════════════════════════════
// SessionToken, zeroed on drop
// ═══════════════════════════════════════════════════════════

/// Backend auth token, zeroed on drop to prevent memory leakage.
#[derive(Zeroize)]
#[zeroize(drop)]
struct SessionToken {
    value: String,
}

impl SessionToken {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Session, one logged-in user
// ═══════════════════════════════════════════════════════════

/// An authenticated session: backend token + display username.
pub struct Session {
    token: SessionToken,
    username: String,
}

impl Session {
    pub fn new(token: &str, username: &str) -> Self {
        Self {
            token: SessionToken::new(token),
            username: username.to_string(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token.value
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

// ═══════════════════════════════════════════════════════════
// SessionStore
// ═══════════════════════════════════════════════════════════

struct StoreState {
    session: Option<Session>,
    /// Username parked between the password step and the 2FA code step,
    /// kept in storage so a restart mid-login lands back on the code screen.
    pending_2fa_user: Option<String>,
}

/// Process-wide session store with file-backed persistence.
///
/// Wrapped in `Arc` at startup so the transport layer and all controllers
/// share the same instance. `RwLock` allows concurrent reads (every
/// outbound request checks for a token) while blocking only on the rare
/// login/logout writes.
pub struct SessionStore {
    state: RwLock<StoreState>,
    /// `None` means memory-only (tests, ephemeral shells).
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Memory-only store; nothing touches disk.
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(StoreState {
                session: None,
                pending_2fa_user: None,
            }),
            path: None,
        }
    }

    /// Open a store backed by `path`, hydrating synchronously.
    ///
    /// A missing file starts logged out; an unreadable one is treated the
    /// same (logged, not fatal).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = load_state(&path);
        Self {
            state: RwLock::new(state),
            path: Some(path),
        }
    }

    /// Open the store at the default per-user location.
    pub fn open_default() -> Self {
        Self::open(config::session_file_path())
    }

    // ── Reads ────────────────────────────────────────────────

    /// Derived: true iff a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .map(|s| s.session.is_some())
            .unwrap_or(false)
    }

    /// Owned copy of the current token, if any.
    pub fn token(&self) -> Option<String> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.session.as_ref().map(|sess| sess.token().to_string()))
    }

    /// Owned copy of the current username, if any.
    pub fn username(&self) -> Option<String> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.session.as_ref().map(|sess| sess.username().to_string()))
    }

    /// Username awaiting its 2FA code, if a login is mid-flight.
    pub fn pending_2fa_user(&self) -> Option<String> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.pending_2fa_user.clone())
    }

    // ── Writes ───────────────────────────────────────────────

    /// Store a session in memory and on disk. Visible to the transport
    /// layer immediately. Any replaced token is zeroed via Drop.
    pub fn login(&self, token: &str, username: &str) -> Result<(), SessionStoreError> {
        let mut state = self.state.write().map_err(|_| SessionStoreError::LockPoisoned)?;
        state.session = Some(Session::new(token, username));
        self.persist(&state)?;
        tracing::info!(username = %username, "Session stored");
        Ok(())
    }

    /// Clear the session from memory and disk. Token zeroed via Drop.
    pub fn logout(&self) -> Result<(), SessionStoreError> {
        let mut state = self.state.write().map_err(|_| SessionStoreError::LockPoisoned)?;
        state.session = None;
        self.persist(&state)?;
        tracing::info!("Session cleared");
        Ok(())
    }

    /// Park a username between the password and 2FA code steps.
    pub fn remember_pending_2fa(&self, username: &str) -> Result<(), SessionStoreError> {
        let mut state = self.state.write().map_err(|_| SessionStoreError::LockPoisoned)?;
        state.pending_2fa_user = Some(username.to_string());
        self.persist(&state)
    }

    /// Drop the parked username once the 2FA step resolves.
    pub fn clear_pending_2fa(&self) -> Result<(), SessionStoreError> {
        let mut state = self.state.write().map_err(|_| SessionStoreError::LockPoisoned)?;
        state.pending_2fa_user = None;
        self.persist(&state)
    }

    // ── Persistence ──────────────────────────────────────────

    fn persist(&self, state: &StoreState) -> Result<(), SessionStoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let persisted = PersistedState {
            auth_token: state.session.as_ref().map(|s| s.token().to_string()),
            username: state.session.as_ref().map(|s| s.username().to_string()),
            pending_2fa_user: state.pending_2fa_user.clone(),
        };
        let json = serde_json::to_string_pretty(&persisted)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// On-disk layout. Keys are fixed and must not change, or existing
/// installs would silently log out on upgrade.
#[derive(Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(rename = "2fa_user", default, skip_serializing_if = "Option::is_none")]
    pending_2fa_user: Option<String>,
}

fn load_state(path: &Path) -> StoreState {
    let persisted = match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<PersistedState>(&raw) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "Session file unreadable, starting logged out");
                PersistedState::default()
            }
        },
        // Missing file is the normal first-run case.
        Err(_) => PersistedState::default(),
    };

    let session = match (persisted.auth_token, persisted.username) {
        (Some(token), Some(username)) => {
            tracing::debug!(username = %username, "Session hydrated from disk");
            Some(Session::new(&token, &username))
        }
        _ => None,
    };

    StoreState {
        session,
        pending_2fa_user: persisted.pending_2fa_user,
    }
}

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

/// Errors from session store writes. Reads degrade to `None`/`false`.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Failed to write session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode session file: {0}")]
    Encode(#[from] serde_json::Error),
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_logged_out() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
        assert!(store.username().is_none());
        assert!(store.pending_2fa_user().is_none());
    }

    #[test]
    fn login_makes_token_visible_immediately() {
        let store = SessionStore::in_memory();
        store.login("tok-123", "ayesha").unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok-123"));
        assert_eq!(store.username().as_deref(), Some("ayesha"));
    }

    #[test]
    fn logout_clears_everything_visible() {
        let store = SessionStore::in_memory();
        store.login("tok-123", "ayesha").unwrap();
        store.logout().unwrap();

        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
        assert!(store.username().is_none());
    }

    #[test]
    fn login_replaces_previous_session() {
        let store = SessionStore::in_memory();
        store.login("tok-1", "first").unwrap();
        store.login("tok-2", "second").unwrap();

        assert_eq!(store.token().as_deref(), Some("tok-2"));
        assert_eq!(store.username().as_deref(), Some("second"));
    }

    #[test]
    fn session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(&path);
        store.login("tok-456", "ravi").unwrap();
        drop(store);

        let reopened = SessionStore::open(&path);
        assert!(reopened.is_authenticated());
        assert_eq!(reopened.token().as_deref(), Some("tok-456"));
        assert_eq!(reopened.username().as_deref(), Some("ravi"));
    }

    #[test]
    fn logout_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(&path);
        store.login("tok-456", "ravi").unwrap();
        store.logout().unwrap();
        drop(store);

        let reopened = SessionStore::open(&path);
        assert!(!reopened.is_authenticated());
    }

    #[test]
    fn persisted_file_uses_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(&path);
        store.login("tok-789", "mia").unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["authToken"], "tok-789");
        assert_eq!(value["username"], "mia");
    }

    #[test]
    fn corrupt_file_starts_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json {{{").unwrap();

        let store = SessionStore::open(&path);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn missing_file_starts_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("nope.json"));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn token_without_username_is_not_a_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"authToken": "tok-only"}"#).unwrap();

        let store = SessionStore::open(&path);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn pending_2fa_round_trip() {
        let store = SessionStore::in_memory();
        store.remember_pending_2fa("ayesha").unwrap();
        assert_eq!(store.pending_2fa_user().as_deref(), Some("ayesha"));

        store.clear_pending_2fa().unwrap();
        assert!(store.pending_2fa_user().is_none());
    }

    #[test]
    fn pending_2fa_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(&path);
        store.remember_pending_2fa("ravi").unwrap();
        drop(store);

        let reopened = SessionStore::open(&path);
        assert_eq!(reopened.pending_2fa_user().as_deref(), Some("ravi"));
        assert!(!reopened.is_authenticated(), "Pending 2FA is not a session");
    }

    #[test]
    fn logout_leaves_pending_2fa_alone() {
        let store = SessionStore::in_memory();
        store.remember_pending_2fa("mia").unwrap();
        store.login("tok-1", "mia").unwrap();
        store.logout().unwrap();

        // Only the explicit 2FA-complete path clears the parked username.
        assert_eq!(store.pending_2fa_user().as_deref(), Some("mia"));
    }
}
