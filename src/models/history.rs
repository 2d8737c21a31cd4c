use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One saved scan, as listed by the history screen.
///
/// `scan_results` stays raw JSON until the row is reopened; reopening runs
/// it through the same normalization as a live response, so old rows saved
/// under earlier backend shapes still render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub drug_names: Vec<String>,
    #[serde(default)]
    pub scan_results: serde_json::Value,
}

impl HistoryEntry {
    /// Comma-joined drug names for list rows.
    pub fn drug_names_label(&self) -> String {
        self.drug_names.join(", ")
    }
}
