//! Canonical view models.
//!
//! Everything the backend returns is reshaped into these structs before any
//! screen logic touches it (`normalize` owns the scan payload reshaping).
//! Fields the backend may omit are `Option` or default to empty so partial
//! responses stay renderable.

pub mod history;
pub mod notification;
pub mod profile;
pub mod scan;

pub use history::HistoryEntry;
pub use notification::Notification;
pub use profile::{TagKind, UserProfile};
pub use scan::{DrugDetail, DrugInfo, InteractionRecord, SafetyCheck, ScanResult};
