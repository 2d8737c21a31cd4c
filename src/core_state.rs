//! Shared application state.
//!
//! `CoreState` owns the one HTTP client and the one session store and
//! hands out screen controllers wired to both. A shell builds it once
//! at startup and keeps it for the life of the process; every
//! controller it produces shares the same session, so a login on the
//! auth screen is immediately visible to the history screen.

use std::sync::Arc;

use crate::api::{ApiClient, DrugsApi};
use crate::controllers::{
    AuthController, CheckController, CheckSeed, HistoryController, ProfileController,
};
use crate::session_store::SessionStore;

pub struct CoreState {
    api: Arc<dyn DrugsApi>,
    session: Arc<SessionStore>,
}

impl CoreState {
    /// Production wiring: HTTP client against the configured backend,
    /// session persisted in the platform data directory.
    pub fn new() -> Self {
        let session = Arc::new(SessionStore::open_default());
        let api = Arc::new(ApiClient::from_env(session.clone()));
        tracing::info!(base_url = %api.base_url(), "Core state ready");
        Self { api, session }
    }

    /// Custom wiring, used by tests and by shells that substitute the
    /// backend (demo mode runs on a scripted mock).
    pub fn with_parts(api: Arc<dyn DrugsApi>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    // ── Shared parts ─────────────────────────────────────────

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Username for the navigation header, when logged in.
    pub fn username(&self) -> Option<String> {
        self.session.username()
    }

    // ── Controller factories ─────────────────────────────────

    pub fn check_controller(&self) -> CheckController {
        CheckController::new(self.api.clone())
    }

    /// Check screen pre-populated by navigation (reopened history row).
    pub fn check_controller_with_seed(&self, seed: CheckSeed) -> CheckController {
        CheckController::with_result(self.api.clone(), seed)
    }

    /// Check screen with a file batch handed over by another screen.
    pub fn check_controller_with_files(&self, files: Vec<std::path::PathBuf>) -> CheckController {
        CheckController::with_files(self.api.clone(), files)
    }

    pub fn history_controller(&self) -> HistoryController {
        HistoryController::new(self.api.clone(), self.session.clone())
    }

    pub fn profile_controller(&self) -> ProfileController {
        ProfileController::new(self.api.clone(), self.session.clone())
    }

    pub fn auth_controller(&self) -> AuthController {
        AuthController::new(self.api.clone(), self.session.clone())
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApi;

    fn mock_state() -> CoreState {
        CoreState::with_parts(
            Arc::new(MockApi::new()),
            Arc::new(SessionStore::in_memory()),
        )
    }

    #[test]
    fn fresh_state_is_logged_out() {
        let state = mock_state();
        assert!(!state.is_authenticated());
        assert!(state.username().is_none());
    }

    #[test]
    fn controllers_share_one_session() {
        let state = mock_state();
        let auth = state.auth_controller();

        auth.login("alice", "pw").unwrap();

        assert!(state.is_authenticated());
        let mut history = state.history_controller();
        history.load();
        assert!(history.rows().is_some());
    }

    #[test]
    fn logout_is_visible_to_every_controller() {
        let state = mock_state();
        let auth = state.auth_controller();
        auth.login("alice", "pw").unwrap();

        auth.logout();

        assert!(!state.is_authenticated());
        let mut history = state.history_controller();
        history.load();
        assert!(history.rows().is_none());
    }
}
