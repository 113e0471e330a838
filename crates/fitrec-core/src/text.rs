//! Text normalization and the embedding-text builders.
//!
//! `build_user_text` is the sole query-side input to the embedding provider;
//! `build_equipment_text` is its catalog-side counterpart used by the offline
//! cache generator.

use crate::types::{EquipmentOption, UserQuery};

/// Strip every character outside `[A-Za-z0-9\s]`, lowercase, trim.
/// Pure and idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    kept.to_lowercase().trim().to_string()
}

/// Single query string for the embedding provider, built from the categorical
/// fields in a fixed order: `goal:`, `experience:`, `gender:`, then one part
/// per preference tag (`group:tag` when the preference has a group). Empty
/// parts are omitted; no other query field participates in semantic search.
pub fn build_user_text(query: &UserQuery) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(goal) = query.goal.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("goal:{goal}"));
    }
    if let Some(experience) = query.experience.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("experience:{experience}"));
    }
    if let Some(gender) = query.gender.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("gender:{gender}"));
    }
    for pref in &query.preferences {
        if let Some(tag) = pref.tag.as_deref().filter(|s| !s.is_empty()) {
            match pref.group.as_deref().filter(|s| !s.is_empty()) {
                Some(group) => parts.push(format!("{group}:{tag}")),
                None => parts.push(tag.to_string()),
            }
        }
    }
    parts.join(" ")
}

/// Catalog-side embedding text: tag names (prefixed with their group when
/// present) followed by attribute values, space-joined.
pub fn build_equipment_text(option: &EquipmentOption) -> String {
    let mut parts: Vec<String> = option
        .tags
        .iter()
        .map(|t| match t.group.as_deref() {
            Some(group) => format!("{group}:{}", t.name),
            None => t.name.clone(),
        })
        .collect();
    parts.extend(option.attribute_values.iter().cloned());
    parts.join(" ")
}

/// Normalized concatenation of name/brand/model/color/material, attribute
/// values and tag names. Cached on the option as `preprocessed_text` and
/// used by the rule engine for substring matching.
pub fn build_preprocessed_text(option: &EquipmentOption) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for field in [
        &option.name,
        &option.brand,
        &option.model,
        &option.color,
        &option.material,
    ] {
        if let Some(v) = field.as_deref().filter(|s| !s.is_empty()) {
            parts.push(v);
        }
    }
    for attr in &option.attribute_values {
        parts.push(attr);
    }
    for tag in &option.tags {
        parts.push(&tag.name);
    }
    normalize(&parts.join(" "))
}
