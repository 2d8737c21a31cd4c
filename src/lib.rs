//! SafeMeds client core.
//!
//! Everything a SafeMeds shell needs short of rendering: the HTTP
//! client for the backend, the persisted session, normalization of
//! scan responses into canonical view models, presentation policy
//! (severity labels, safety badges, AI-summary segmentation, the
//! collapsible-card content model), and one controller per screen.
//!
//! A shell builds a [`core_state::CoreState`] at startup, asks it for
//! controllers, and renders from their state. Controllers never render
//! and the display helpers never touch the network, so any frontend
//! that can call Rust can sit on top.

pub mod api;
pub mod config;
pub mod controllers;
pub mod core_state;
pub mod display;
pub mod models;
pub mod normalize;
pub mod session_store;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a shell binary. `RUST_LOG` wins when set;
/// otherwise the crate logs at info.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("SafeMeds core starting v{}", config::APP_VERSION);
}
