//! Collapsible detail cards.
//!
//! Drug details, safety matches, and interaction descriptions arrive as
//! loosely-typed JSON: sometimes a prose string, sometimes a list,
//! sometimes a keyed record several levels deep. [`CardContent`]
//! classifies a value once, at the boundary, into a shape a shell can
//! walk without re-inspecting JSON; [`CollapsibleCard`] adds the
//! open/closed toggle in both self-managed and parent-controlled modes.
//!
//! Key properties:
//! - Empty input (absent, blank string, empty list or record) renders a
//!   static placeholder with no toggle affordance.
//! - An empty list nested inside a record renders "No relevant
//!   matches." rather than a bare empty list.
//! - Classification is pure and total: any JSON value maps to some
//!   `CardContent`, never an error.

use serde_json::Value;

/// Placeholder for a card whose content is entirely empty.
pub const EMPTY_PLACEHOLDER: &str = "No detailed information available.";

/// Placeholder for an empty list nested inside a record.
pub const NO_MATCHES_PLACEHOLDER: &str = "No relevant matches.";

/// A card body, classified from raw JSON at render-model build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardContent {
    Empty,
    /// Trimmed, non-empty paragraphs.
    Text(Vec<String>),
    /// Bulleted items, stringified.
    List(Vec<String>),
    /// Humanized key paired with its recursively classified value.
    Record(Vec<(String, CardContent)>),
}

impl CardContent {
    /// Classify a raw value for a card body.
    ///
    /// Top-level emptiness of any shape collapses to [`CardContent::Empty`];
    /// nested values keep their structure so record rendering can show
    /// the per-field placeholders.
    pub fn classify(value: &Value) -> Self {
        match Self::classify_nested(value) {
            CardContent::List(items) if items.is_empty() => CardContent::Empty,
            content => content,
        }
    }

    fn classify_nested(value: &Value) -> Self {
        match value {
            Value::Null => CardContent::Empty,
            Value::String(s) => {
                let paragraphs: Vec<String> = s
                    .split('\n')
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect();
                if paragraphs.is_empty() {
                    CardContent::Empty
                } else {
                    CardContent::Text(paragraphs)
                }
            }
            Value::Array(items) => {
                CardContent::List(items.iter().map(item_text).collect())
            }
            Value::Object(map) => {
                if map.is_empty() {
                    CardContent::Empty
                } else {
                    CardContent::Record(
                        map.iter()
                            .map(|(key, val)| (humanize_key(key), Self::classify_nested(val)))
                            .collect(),
                    )
                }
            }
            Value::Bool(b) => CardContent::Text(vec![b.to_string()]),
            Value::Number(n) => CardContent::Text(vec![n.to_string()]),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CardContent::Empty)
    }

    /// Placeholder text a shell should render instead of this content,
    /// if any.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            CardContent::Empty => Some(EMPTY_PLACEHOLDER),
            CardContent::List(items) if items.is_empty() => Some(NO_MATCHES_PLACEHOLDER),
            _ => None,
        }
    }
}

/// List items display as their string form; nested structure inside a
/// list is flattened to compact JSON, matching the original renderer.
fn item_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Wire keys like `matched_allergies` display as "Matched Allergies".
fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ─────────────── Toggle state machine ───────────────

/// What a toggle request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleResponse {
    /// Static card (empty content): nothing to toggle.
    Ignored,
    /// Self-managed card flipped; `open` is the new state.
    Applied { open: bool },
    /// Parent-controlled card: the owner should flip its own flag.
    Notify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToggleMode {
    Internal { open: bool },
    Controlled,
}

/// A titled, collapsible content card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsibleCard {
    title: String,
    content: CardContent,
    mode: ToggleMode,
}

impl CollapsibleCard {
    /// Card owning its own open/closed flag, initially closed.
    pub fn new(title: impl Into<String>, value: &Value) -> Self {
        Self {
            title: title.into(),
            content: CardContent::classify(value),
            mode: ToggleMode::Internal { open: false },
        }
    }

    /// Card whose open/closed flag lives with the parent; toggle
    /// requests come back as [`ToggleResponse::Notify`].
    pub fn controlled(title: impl Into<String>, value: &Value) -> Self {
        Self {
            title: title.into(),
            content: CardContent::classify(value),
            mode: ToggleMode::Controlled,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &CardContent {
        &self.content
    }

    /// Whether the card offers a toggle at all. Empty cards are static.
    pub fn has_toggle(&self) -> bool {
        !self.content.is_empty()
    }

    /// Open state of a self-managed card. Controlled cards report
    /// closed; their real state lives with the parent.
    pub fn is_open(&self) -> bool {
        matches!(self.mode, ToggleMode::Internal { open: true })
    }

    pub fn toggle(&mut self) -> ToggleResponse {
        if !self.has_toggle() {
            return ToggleResponse::Ignored;
        }
        match &mut self.mode {
            ToggleMode::Internal { open } => {
                *open = !*open;
                ToggleResponse::Applied { open: *open }
            }
            ToggleMode::Controlled => ToggleResponse::Notify,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_and_blank_content_classify_empty() {
        assert_eq!(CardContent::classify(&Value::Null), CardContent::Empty);
        assert_eq!(CardContent::classify(&json!("")), CardContent::Empty);
        assert_eq!(CardContent::classify(&json!("  \n  ")), CardContent::Empty);
        assert_eq!(CardContent::classify(&json!([])), CardContent::Empty);
        assert_eq!(CardContent::classify(&json!({})), CardContent::Empty);
    }

    #[test]
    fn text_splits_into_trimmed_paragraphs() {
        let content = CardContent::classify(&json!("Take daily.\n\n  With food.  "));
        assert_eq!(
            content,
            CardContent::Text(vec!["Take daily.".into(), "With food.".into()])
        );
    }

    #[test]
    fn lists_keep_order_and_stringify_items() {
        let content = CardContent::classify(&json!(["Peanuts", 3, "Shellfish"]));
        assert_eq!(
            content,
            CardContent::List(vec!["Peanuts".into(), "3".into(), "Shellfish".into()])
        );
    }

    #[test]
    fn records_humanize_keys_and_recurse() {
        let content = CardContent::classify(&json!({
            "matched_allergies": ["Peanuts"],
            "explanation": "Contains peanut oil.",
        }));

        let CardContent::Record(fields) = content else {
            panic!("Expected record content");
        };
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().any(|(key, value)| {
            key == "Matched Allergies" && *value == CardContent::List(vec!["Peanuts".into()])
        }));
        assert!(fields.iter().any(|(key, value)| {
            key == "Explanation"
                && *value == CardContent::Text(vec!["Contains peanut oil.".into()])
        }));
    }

    #[test]
    fn empty_list_inside_record_keeps_no_matches_placeholder() {
        let content = CardContent::classify(&json!({"matched_conditions": []}));

        let CardContent::Record(fields) = content else {
            panic!("Expected record content");
        };
        assert_eq!(fields[0].1.placeholder(), Some(NO_MATCHES_PLACEHOLDER));
    }

    #[test]
    fn empty_card_is_static() {
        let mut card = CollapsibleCard::new("Warnings", &Value::Null);
        assert!(!card.has_toggle());
        assert_eq!(card.content().placeholder(), Some(EMPTY_PLACEHOLDER));
        assert_eq!(card.toggle(), ToggleResponse::Ignored);
        assert!(!card.is_open());
    }

    #[test]
    fn toggling_twice_returns_to_closed() {
        let mut card = CollapsibleCard::new("Side Effects", &json!("Nausea"));
        assert!(!card.is_open());

        assert_eq!(card.toggle(), ToggleResponse::Applied { open: true });
        assert!(card.is_open());

        assert_eq!(card.toggle(), ToggleResponse::Applied { open: false });
        assert!(!card.is_open());
    }

    #[test]
    fn controlled_card_defers_to_parent() {
        let mut card = CollapsibleCard::controlled("Details", &json!("text"));
        assert!(card.has_toggle());
        assert_eq!(card.toggle(), ToggleResponse::Notify);
        assert!(!card.is_open());
    }

    #[test]
    fn humanize_handles_multiword_keys() {
        assert_eq!(humanize_key("matched_allergies"), "Matched Allergies");
        assert_eq!(humanize_key("explanation"), "Explanation");
        assert_eq!(humanize_key("side_effects"), "Side Effects");
    }
}
