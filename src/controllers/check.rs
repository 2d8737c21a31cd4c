//! Check screen: run a scan by typed names or label photos.
//!
//! The screen has three ways in: the user types a comma-separated drug
//! list, picks label images, or arrives pre-populated by navigation (a
//! history row reopened, or a file batch handed over by the landing
//! page). In the pre-selected-files case the scan fires automatically
//! exactly once on mount, and only if nothing is loaded or in flight.
//!
//! Key properties:
//! - Manual entry is split on commas, trimmed, and must yield at least
//!   two names before any request goes out.
//! - Image mode with no files selected is a silent no-op.
//! - Reset clears input, files, result, error, and carried navigation
//!   state in one step.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::Phase;
use crate::api::{ApiError, DrugsApi};
use crate::display::{BadgeStyle, CollapsibleCard};
use crate::models::{DrugDetail, InteractionRecord, SafetyCheck, ScanResult};

/// Inline warning when manual entry yields fewer than two names.
pub const TOO_FEW_NAMES: &str = "Please enter at least two drug names.";

/// Body of an interaction card whose record has no description.
pub const NO_DESCRIPTION_PLACEHOLDER: &str = "No description available.";

/// Explanation line when a safety verdict arrives without one.
pub const DEFAULT_SAFETY_EXPLANATION: &str = "Additional caution may be needed.";

/// State carried into the check screen by navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSeed {
    pub result: ScanResult,
    /// When the seed is a reopened history row, the row's scan date.
    pub scanned_at: Option<DateTime<Utc>>,
}

pub struct CheckController {
    api: Arc<dyn DrugsApi>,
    phase: Phase<ScanResult>,
    drug_input: String,
    files: Vec<PathBuf>,
    reopened_at: Option<DateTime<Utc>>,
    mounted: bool,
    generation: u64,
}

impl CheckController {
    pub fn new(api: Arc<dyn DrugsApi>) -> Self {
        Self {
            api,
            phase: Phase::Idle,
            drug_input: String::new(),
            files: Vec::new(),
            reopened_at: None,
            mounted: false,
            generation: 0,
        }
    }

    /// Start on a previously computed result (history "reopen"). No
    /// request is issued; the result renders as-is.
    pub fn with_result(api: Arc<dyn DrugsApi>, seed: CheckSeed) -> Self {
        let mut controller = Self::new(api);
        controller.reopened_at = seed.scanned_at;
        controller.phase = Phase::Success(seed.result);
        controller
    }

    /// Start with a pre-selected file batch (landing page hand-off).
    /// [`Self::on_mount`] will fire the scan automatically.
    pub fn with_files(api: Arc<dyn DrugsApi>, files: Vec<PathBuf>) -> Self {
        let mut controller = Self::new(api);
        controller.files = files;
        controller
    }

    // ── Input ────────────────────────────────────────────────

    pub fn set_drug_input(&mut self, input: impl Into<String>) {
        self.drug_input = input.into();
    }

    pub fn drug_input(&self) -> &str {
        &self.drug_input
    }

    pub fn add_files(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        self.files.extend(paths);
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    // ── Lifecycle ────────────────────────────────────────────

    /// One-shot mount hook: if files were handed over by navigation and
    /// nothing is loaded or loading, run the scan. Later calls do
    /// nothing, so a re-rendered screen cannot scan twice.
    pub fn on_mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        if !self.files.is_empty() && self.phase.value().is_none() && !self.phase.is_loading() {
            self.scan_images();
        }
    }

    /// Check the manually entered names.
    pub fn check_names(&mut self) {
        let names = parse_names(&self.drug_input);
        if names.len() < 2 {
            self.phase = Phase::Failure(TOO_FEW_NAMES.to_string());
            return;
        }
        let generation = self.begin();
        let outcome = self.api.scan_names(&names);
        self.finish(generation, outcome);
    }

    /// Scan the selected label images. No files selected is a no-op.
    pub fn scan_images(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let generation = self.begin();
        let outcome = self.api.scan_images(&self.files);
        self.finish(generation, outcome);
    }

    /// Back to a blank input screen, dropping carried navigation state.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.drug_input.clear();
        self.files.clear();
        self.reopened_at = None;
    }

    // ── Reads ────────────────────────────────────────────────

    pub fn result(&self) -> Option<&ScanResult> {
        self.phase.value()
    }

    pub fn error(&self) -> Option<&str> {
        self.phase.error()
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    /// Scan date of a reopened history row, for the report header.
    pub fn reopened_at(&self) -> Option<DateTime<Utc>> {
        self.reopened_at
    }

    // ── Request bookkeeping ──────────────────────────────────

    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.generation
    }

    fn finish(&mut self, generation: u64, outcome: Result<ScanResult, ApiError>) {
        if generation != self.generation {
            tracing::debug!("Discarding stale scan completion");
            return;
        }
        self.phase = match outcome {
            Ok(result) => {
                tracing::info!(
                    drugs = result.found_drug_names.len(),
                    interactions = result.interactions.len(),
                    "Scan complete"
                );
                Phase::Success(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Scan failed");
                Phase::Failure(e.to_string())
            }
        };
    }
}

/// Split manual entry on commas, trim, drop empties.
fn parse_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

// ─────────────── Report view models ───────────────

/// Heading for one interaction card, e.g. "Aspirin & Warfarin".
pub fn interaction_title(record: &InteractionRecord) -> String {
    format!("{} & {}", record.drug_a, record.drug_b)
}

/// The collapsible "Interaction Details" card under each interaction.
pub fn interaction_card(record: &InteractionRecord) -> CollapsibleCard {
    let description = record
        .description
        .as_deref()
        .unwrap_or(NO_DESCRIPTION_PLACEHOLDER);
    CollapsibleCard::new("Interaction Details", &Value::String(description.to_string()))
}

/// One collapsible card per reference-text section the backend filled
/// in. An empty result means the drug card shows its own placeholder.
pub fn info_cards(detail: &DrugDetail) -> Vec<CollapsibleCard> {
    let Some(info) = &detail.info else {
        return Vec::new();
    };
    [
        ("Administration", &info.administration),
        ("Side Effects", &info.side_effects),
        ("Warnings", &info.warnings),
    ]
    .into_iter()
    .filter_map(|(title, text)| {
        text.as_ref()
            .map(|body| CollapsibleCard::new(title, &Value::String(body.clone())))
    })
    .collect()
}

/// Ready-to-render safety verdict for one drug card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyBadgeView {
    /// Backend label, shown verbatim inside the badge.
    pub label: String,
    pub style: BadgeStyle,
    pub explanation: String,
}

pub fn safety_badge_view(check: &SafetyCheck) -> SafetyBadgeView {
    SafetyBadgeView {
        label: check.badge.clone(),
        style: BadgeStyle::from_label(&check.badge),
        explanation: if check.explanation.is_empty() {
            DEFAULT_SAFETY_EXPLANATION.to_string()
        } else {
            check.explanation.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApi;
    use crate::display::CardContent;
    use crate::models::DrugInfo;

    fn scripted(mock: MockApi) -> (Arc<MockApi>, CheckController) {
        let mock = Arc::new(mock);
        let controller = CheckController::new(mock.clone());
        (mock, controller)
    }

    fn sample_result() -> ScanResult {
        ScanResult {
            found_drug_names: vec!["Aspirin".into(), "Warfarin".into()],
            ..Default::default()
        }
    }

    #[test]
    fn manual_entry_splits_and_trims() {
        assert_eq!(
            parse_names(" Aspirin , ,Warfarin,  "),
            vec!["Aspirin".to_string(), "Warfarin".to_string()]
        );
        assert!(parse_names("").is_empty());
        assert!(parse_names(" , , ").is_empty());
    }

    #[test]
    fn fewer_than_two_names_never_hits_the_backend() {
        let (mock, mut controller) = scripted(MockApi::new());
        controller.set_drug_input("Aspirin");
        controller.check_names();

        assert_eq!(controller.error(), Some(TOO_FEW_NAMES));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn successful_name_check_reaches_success() {
        let (mock, mut controller) = scripted(MockApi::new().with_scan(sample_result()));
        controller.set_drug_input("Aspirin, Warfarin");
        controller.check_names();

        assert_eq!(controller.result(), Some(&sample_result()));
        assert_eq!(mock.calls(), vec!["scan_names"]);
    }

    #[test]
    fn scan_failure_surfaces_the_backend_message() {
        let (_, mut controller) = scripted(MockApi::new().failing(
            "scan_names",
            ApiError::Backend {
                status: 400,
                message: "Could not identify drugs.".into(),
            },
        ));
        controller.set_drug_input("Aspirin, Warfarin");
        controller.check_names();

        assert_eq!(controller.error(), Some("Could not identify drugs."));
    }

    #[test]
    fn image_scan_without_files_is_a_silent_no_op() {
        let (mock, mut controller) = scripted(MockApi::new());
        controller.scan_images();

        assert!(controller.error().is_none());
        assert!(!controller.is_loading());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn mount_with_handed_over_files_scans_exactly_once() {
        let mock = Arc::new(MockApi::new().with_scan(sample_result()));
        let mut controller =
            CheckController::with_files(mock.clone(), vec![PathBuf::from("label.jpg")]);

        controller.on_mount();
        controller.on_mount();

        assert_eq!(mock.calls(), vec!["scan_images"]);
        assert!(controller.result().is_some());
    }

    #[test]
    fn mount_with_existing_result_does_not_rescan() {
        let mock = Arc::new(MockApi::new());
        let seed = CheckSeed {
            result: sample_result(),
            scanned_at: Some(Utc::now()),
        };
        let mut controller = CheckController::with_result(mock.clone(), seed);
        controller.add_files([PathBuf::from("label.jpg")]);

        controller.on_mount();

        assert!(mock.calls().is_empty());
        assert_eq!(controller.result(), Some(&sample_result()));
        assert!(controller.reopened_at().is_some());
    }

    #[test]
    fn reset_clears_input_files_result_and_carried_state() {
        let mock = Arc::new(MockApi::new());
        let seed = CheckSeed {
            result: sample_result(),
            scanned_at: Some(Utc::now()),
        };
        let mut controller = CheckController::with_result(mock, seed);
        controller.set_drug_input("Aspirin, Warfarin");
        controller.add_files([PathBuf::from("label.jpg")]);

        controller.reset();

        assert!(controller.result().is_none());
        assert!(controller.error().is_none());
        assert!(controller.drug_input().is_empty());
        assert!(controller.files().is_empty());
        assert!(controller.reopened_at().is_none());
    }

    #[test]
    fn stale_completion_is_discarded_after_reset() {
        let (_, mut controller) = scripted(MockApi::new());
        let generation = controller.begin();
        controller.reset();
        controller.finish(generation, Ok(sample_result()));

        assert!(controller.result().is_none());
        assert!(!controller.is_loading());
    }

    #[test]
    fn interaction_card_falls_back_without_description() {
        let record = InteractionRecord {
            drug_a: "Aspirin".into(),
            drug_b: "Warfarin".into(),
            severity: "MAJOR".into(),
            description: None,
        };

        assert_eq!(interaction_title(&record), "Aspirin & Warfarin");
        let card = interaction_card(&record);
        assert_eq!(card.title(), "Interaction Details");
        assert_eq!(
            card.content(),
            &CardContent::Text(vec![NO_DESCRIPTION_PLACEHOLDER.to_string()])
        );
    }

    #[test]
    fn info_cards_cover_only_present_sections() {
        let detail = DrugDetail {
            name: "Aspirin".into(),
            info: Some(DrugInfo {
                administration: Some("With food.".into()),
                side_effects: None,
                warnings: Some("Bleeding risk.".into()),
            }),
            safety_check: None,
        };

        let cards = info_cards(&detail);
        let titles: Vec<&str> = cards.iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["Administration", "Warnings"]);

        let bare = DrugDetail {
            name: "Mystery".into(),
            info: None,
            safety_check: None,
        };
        assert!(info_cards(&bare).is_empty());
    }

    #[test]
    fn safety_badge_view_fills_in_a_default_explanation() {
        let check = SafetyCheck {
            badge: "Health Risk".into(),
            explanation: String::new(),
            ..Default::default()
        };

        let view = safety_badge_view(&check);
        assert_eq!(view.label, "Health Risk");
        assert_eq!(view.style, BadgeStyle::Danger);
        assert_eq!(view.explanation, DEFAULT_SAFETY_EXPLANATION);
    }
}
