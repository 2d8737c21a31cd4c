//! Scan response normalization.
//!
//! The backend's scan payload has changed shape across iterations:
//! `found_drug_names` was once `found_drugs`, `drug_details` appeared as
//! `drugDetails`, per-drug info moved between `info` and `druginfo`,
//! interaction endpoints have been flat `drug_1`/`drug_2` strings and
//! nested `drug_a`/`drug_b` objects, and `ai_summary` has been both a
//! bare string and a `{summary}` wrapper. This module is the only place
//! allowed to read raw wire field names; everything downstream consumes
//! the canonical [`ScanResult`].
//!
//! Key properties:
//! - Each field resolves through an ordered candidate chain, newest
//!   name first, defaulting to empty rather than erroring.
//! - Total over arbitrary JSON: wrong-typed fields degrade to their
//!   empty defaults, never a panic or error.
//! - Source array order is preserved; nothing is deduplicated or
//!   re-sorted.
//! - Pure and idempotent: canonical input normalizes to itself.

use serde_json::Value;

use crate::models::{DrugDetail, DrugInfo, InteractionRecord, SafetyCheck, ScanResult};

/// Build the canonical scan model from a raw backend payload.
pub fn scan_result(raw: &Value) -> ScanResult {
    ScanResult {
        found_drug_names: string_array(field(raw, &["found_drug_names", "found_drugs"])),
        drug_details: drug_details(field(raw, &["drug_details", "drugDetails"])),
        interactions: interactions(raw.get("interactions")),
        ai_summary: summary(raw.get("ai_summary")),
    }
}

/// First candidate field that is present and non-null.
fn field<'a>(raw: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|name| raw.get(name))
        .find(|v| !v.is_null())
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn opt_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `ai_summary` has shipped as a bare string and as `{summary}`.
fn summary(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Object(map)) => opt_string(map.get("summary")),
        _ => None,
    }
}

fn drug_details(value: Option<&Value>) -> Vec<DrugDetail> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(drug_detail).collect())
        .unwrap_or_default()
}

fn drug_detail(entry: &Value) -> Option<DrugDetail> {
    let entry = entry.as_object()?;
    Some(DrugDetail {
        name: entry
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        info: field_of(entry, &["info", "druginfo"]).and_then(drug_info),
        safety_check: field_of(entry, &["safety_check", "safety"]).and_then(safety_check),
    })
}

fn field_of<'a>(
    entry: &'a serde_json::Map<String, Value>,
    candidates: &[&str],
) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|name| entry.get(*name))
        .find(|v| !v.is_null())
}

fn drug_info(value: &Value) -> Option<DrugInfo> {
    let map = value.as_object()?;
    Some(DrugInfo {
        administration: opt_string(map.get("administration")),
        side_effects: opt_string(map.get("side_effects")),
        warnings: opt_string(map.get("warnings")),
    })
}

fn safety_check(value: &Value) -> Option<SafetyCheck> {
    let map = value.as_object()?;
    Some(SafetyCheck {
        badge: field_of(map, &["badge", "safety_badge"])
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        matched_allergies: string_array(map.get("matched_allergies")),
        matched_conditions: string_array(map.get("matched_conditions")),
        explanation: map
            .get("explanation")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

fn interactions(value: Option<&Value>) -> Vec<InteractionRecord> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(interaction).collect())
        .unwrap_or_default()
}

fn interaction(entry: &Value) -> Option<InteractionRecord> {
    let entry = entry.as_object()?;
    Some(InteractionRecord {
        drug_a: drug_name(entry, &["drug_a", "drug_1"]),
        drug_b: drug_name(entry, &["drug_b", "drug_2"]),
        severity: entry
            .get("severity")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        description: opt_string(entry.get("description")),
    })
}

/// Interaction endpoints are flat strings in the current wire format
/// and `{name}` objects in the serializer-backed one.
fn drug_name(entry: &serde_json::Map<String, Value>, candidates: &[&str]) -> String {
    for name in candidates {
        match entry.get(*name) {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Object(map)) => {
                if let Some(n) = map.get("name").and_then(Value::as_str) {
                    return n.to_string();
                }
            }
            _ => {}
        }
    }
    String::new()
}
