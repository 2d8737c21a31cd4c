use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Server-side user profile as consumed by the profile screen.
///
/// The server is authoritative: the client holds an optimistically-edited
/// copy and reloads the whole record whenever a save fails. Allergy and
/// condition edits are whole-list replacements, never partial patches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scan_count: u64,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_2fa_enabled: Option<bool>,
}

/// The two editable tag lists on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Allergies,
    Conditions,
}

impl TagKind {
    /// Wire field name the replacement payload is keyed under.
    pub fn field_name(self) -> &'static str {
        match self {
            TagKind::Allergies => "allergies",
            TagKind::Conditions => "conditions",
        }
    }
}
