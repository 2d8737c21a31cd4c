//! Presentation policy: how backend values become user-facing output.
//!
//! Everything here is pure and render-agnostic. Severity and badge
//! mappings, AI-summary segmentation, and the collapsible-card content
//! model never touch the network and never influence what is sent back
//! to the backend.

pub mod badge;
pub mod card;
pub mod severity;
pub mod summary;

pub use badge::BadgeStyle;
pub use card::{CardContent, CollapsibleCard, ToggleResponse};
pub use severity::severity_label;
pub use summary::{segment_summary, Segment};
