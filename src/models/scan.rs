use serde::{Deserialize, Serialize};

/// One normalized scan-and-check response.
///
/// Built fresh from each backend response; never mutated in place. A reopened
/// history row produces a new instance through the same normalization path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Drug names the backend recognized, in backend order.
    #[serde(default)]
    pub found_drug_names: Vec<String>,
    /// Per-drug details. NOT positionally aligned with `found_drug_names`;
    /// match by `name` when a pairing is needed.
    #[serde(default)]
    pub drug_details: Vec<DrugDetail>,
    #[serde(default)]
    pub interactions: Vec<InteractionRecord>,
    #[serde(default)]
    pub ai_summary: Option<String>,
}

impl ScanResult {
    /// True when the backend found nothing to show at all.
    pub fn is_empty(&self) -> bool {
        self.found_drug_names.is_empty()
            && self.drug_details.is_empty()
            && self.interactions.is_empty()
            && self.ai_summary.is_none()
    }
}

/// Details for a single recognized drug.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugDetail {
    pub name: String,
    /// Reference text sections; each may be absent independently.
    #[serde(default)]
    pub info: Option<DrugInfo>,
    /// Personalized safety evaluation against the user's saved allergies
    /// and conditions. Absent for anonymous scans.
    #[serde(default)]
    pub safety_check: Option<SafetyCheck>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugInfo {
    #[serde(default)]
    pub administration: Option<String>,
    #[serde(default)]
    pub side_effects: Option<String>,
    #[serde(default)]
    pub warnings: Option<String>,
}

impl DrugInfo {
    pub fn is_empty(&self) -> bool {
        self.administration.is_none() && self.side_effects.is_none() && self.warnings.is_none()
    }
}

/// Backend safety verdict for one drug.
///
/// `badge` is an open set ("Safe", "Use With Caution", "Mild Caution",
/// "Health Risk", ...); unknown values must still render, styled neutrally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyCheck {
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub matched_allergies: Vec<String>,
    #[serde(default)]
    pub matched_conditions: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}

/// One pairwise interaction between two recognized drugs.
///
/// `severity` is an open set (MAJOR/MODERATE/MINOR/LOW, ...) compared
/// case-insensitively by the display layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub drug_a: String,
    pub drug_b: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub description: Option<String>,
}
