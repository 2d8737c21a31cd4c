//! Safety badge styling.
//!
//! The backend's badge text is an open set; known values map to a color
//! bucket and anything else styles as neutral. Matching ignores case
//! and treats hyphens, underscores, and runs of whitespace alike, since
//! the wire has carried "Use With Caution", "use-with-caution", and
//! friends interchangeably.

use std::fmt;

/// Color bucket for a safety badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Danger,
    Warning,
    Info,
    Success,
    Neutral,
}

impl BadgeStyle {
    /// Classify raw backend badge text.
    pub fn from_label(raw: &str) -> Self {
        match fold(raw).as_str() {
            "health risk" => BadgeStyle::Danger,
            "use with caution" | "caution" => BadgeStyle::Warning,
            "mild caution" => BadgeStyle::Info,
            "safe" => BadgeStyle::Success,
            _ => BadgeStyle::Neutral,
        }
    }

    /// Stable identifier, usable as a CSS class suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeStyle::Danger => "danger",
            BadgeStyle::Warning => "warning",
            BadgeStyle::Info => "info",
            BadgeStyle::Success => "success",
            BadgeStyle::Neutral => "neutral",
        }
    }
}

impl fmt::Display for BadgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase with hyphens/underscores as spaces and whitespace runs
/// collapsed, so formatting variants of the same label compare equal.
fn fold(raw: &str) -> String {
    raw.to_ascii_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_badges_map_to_buckets() {
        assert_eq!(BadgeStyle::from_label("Health Risk"), BadgeStyle::Danger);
        assert_eq!(BadgeStyle::from_label("Use With Caution"), BadgeStyle::Warning);
        assert_eq!(BadgeStyle::from_label("Caution"), BadgeStyle::Warning);
        assert_eq!(BadgeStyle::from_label("Mild Caution"), BadgeStyle::Info);
        assert_eq!(BadgeStyle::from_label("Safe"), BadgeStyle::Success);
    }

    #[test]
    fn formatting_variants_resolve_identically() {
        for raw in [
            "use with caution",
            "Use-With-Caution",
            "USE_WITH_CAUTION",
            "use  with   caution",
        ] {
            assert_eq!(BadgeStyle::from_label(raw), BadgeStyle::Warning);
        }
    }

    #[test]
    fn unknown_badges_are_neutral() {
        assert_eq!(BadgeStyle::from_label("Recalled"), BadgeStyle::Neutral);
        assert_eq!(BadgeStyle::from_label(""), BadgeStyle::Neutral);
    }

    #[test]
    fn style_identifier_is_stable() {
        assert_eq!(BadgeStyle::Danger.as_str(), "danger");
        assert_eq!(BadgeStyle::Neutral.to_string(), "neutral");
    }
}
