//! Screen controllers.
//!
//! One controller per screen, each a small state machine over
//! [`Phase`]: Idle → Loading → Success or Failure, with an explicit
//! reset back to Idle. Controllers drive the backend through
//! `Arc<dyn DrugsApi>`, so tests script them with `MockApi`.
//!
//! Key properties:
//! - One outstanding request per controller; an operation runs to
//!   completion before another can start.
//! - Every failure becomes a user-visible message; nothing retries.
//! - Each controller keeps a request generation counter; a completion
//!   whose generation is no longer current is discarded instead of
//!   clobbering newer state.
//! - Destructive operations take an explicit [`Confirm`] and do
//!   nothing at all when the dialog was cancelled.

pub mod auth;
pub mod check;
pub mod history;
pub mod profile;

pub use auth::{AuthController, LoginStep};
pub use check::{CheckController, CheckSeed};
pub use history::HistoryController;
pub use profile::{ProfileController, ProfileData};

/// Shared screen lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Idle,
    Loading,
    Success(T),
    Failure(String),
}

impl<T> Phase<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    /// The loaded value, when in `Success`.
    pub fn value(&self) -> Option<&T> {
        match self {
            Phase::Success(value) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Phase::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, when in `Failure`.
    pub fn error(&self) -> Option<&str> {
        match self {
            Phase::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// Outcome of the confirmation dialog a shell shows before a
/// destructive action. `Cancelled` returns before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Cancelled,
    Confirmed,
}

impl Confirm {
    pub fn is_confirmed(self) -> bool {
        matches!(self, Confirm::Confirmed)
    }
}
