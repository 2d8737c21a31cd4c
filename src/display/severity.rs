//! Interaction severity labels.
//!
//! Key properties:
//! - Case-insensitive: the backend has emitted "MAJOR", "Major", and
//!   "major" across iterations.
//! - Open set: an unrecognized severity passes through unchanged so new
//!   backend categories display as themselves rather than a blank.

/// User-facing label for a backend severity string.
pub fn severity_label(raw: &str) -> String {
    match raw.to_ascii_lowercase().as_str() {
        "low" | "minor" => "Low-level caution".to_string(),
        "moderate" => "Moderate interaction".to_string(),
        "major" | "high" => "Serious interaction".to_string(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_and_minor_share_a_label() {
        for raw in ["low", "LOW", "Minor", "minor"] {
            assert_eq!(severity_label(raw), "Low-level caution");
        }
    }

    #[test]
    fn moderate_is_case_insensitive() {
        for raw in ["moderate", "MODERATE", "Moderate"] {
            assert_eq!(severity_label(raw), "Moderate interaction");
        }
    }

    #[test]
    fn major_and_high_are_serious() {
        for raw in ["major", "HIGH", "high", "Major"] {
            assert_eq!(severity_label(raw), "Serious interaction");
        }
    }

    #[test]
    fn unknown_severity_passes_through() {
        assert_eq!(severity_label("Contraindicated"), "Contraindicated");
        assert_eq!(severity_label(""), "");
    }
}
