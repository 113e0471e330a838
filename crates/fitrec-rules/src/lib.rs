//! Deterministic rule scoring for equipment options.
//!
//! Every weight lives in the tables below; `score` walks the rule groups in a
//! fixed order and returns both the additive total and a structured breakdown
//! of which rules fired. Scoring is pure: identical `(option, query, text)`
//! always produces the identical result, and a rule whose prerequisite query
//! field is absent simply does not fire.
//!
//! String comparisons are case-insensitive. Catalog labels are lowercased at
//! ingestion; the query side is lowercased again here so the function stands
//! on its own.

use fitrec_core::types::{EquipmentOption, RuleHit, UserQuery};

/// Attribute name -> flat bonus, applied whenever the option carries it.
const ATTRIBUTE_BONUS: &[(&str, f32)] = &[
    ("adjustable", 2.0),
    ("compact", 2.0),
    ("portable", 1.0),
    ("foldable", 1.0),
    ("budget", 1.0),
    ("multi-function", 2.0),
];

/// Goal -> tags that serve it. Each listed tag is worth 4 when present in the
/// option's tags and 2 when present in its attribute values.
const GOAL_TAGS: &[(&str, &[&str])] = &[
    ("tone", &["bodyweight", "multi-function", "compact"]),
    ("build-muscle", &["resistance", "weighted", "barbell-compatible"]),
    ("weight-loss", &["cardio", "endurance", "bodyweight"]),
    ("rehab", &["low-impact", "joint-friendly", "stretching"]),
    ("mobility", &["stretching", "flexibility", "balance"]),
    ("strength", &["weighted", "barbell-compatible", "resistance"]),
    ("endurance", &["cardio", "row", "treadmill"]),
    ("flexibility", &["stretching", "mobility"]),
    ("posture-correction", &["core", "back", "adjustable"]),
    ("pre/post-natal", &["low-impact", "core", "mobility"]),
    ("athletic-training", &["cable", "multi-function", "tower"]),
    ("injury-prevention", &["joint-friendly", "adjustable"]),
    ("functionality", &["full-body", "multi-function"]),
];

const FEMALE_FOCUS_TAGS: &[&str] = &["glutes", "core", "abs"];
const FEMALE_FRIENDLY_ATTRS: &[&str] = &["compact", "adjustable"];
const MALE_FOCUS_TAGS: &[&str] = &["arms", "chest", "pull-up"];
const SENIOR_SAFE_TAGS: &[&str] = &["low-impact", "joint-friendly", "post-injury"];
const ELDERLY_TAGS: &[&str] = &["elderly", "joint-friendly"];

/// Score one option against one query. `option_text` is the option's cached
/// preprocessed text (lowercase) used for substring rules. Returns the total
/// and one `RuleHit` per fired rule; the total is exactly the sum of the
/// hit weights.
pub fn score(option: &EquipmentOption, query: &UserQuery, option_text: &str) -> (f32, Vec<RuleHit>) {
    let mut hits = Vec::new();
    preference_rules(option, query, option_text, &mut hits);
    attribute_rules(option, &mut hits);
    gender_rules(option, query, option_text, &mut hits);
    age_rules(option, query, &mut hits);
    goal_rules(option, query, &mut hits);
    experience_rules(option, query, &mut hits);
    profile_rules(query, &mut hits);
    let total = hits.iter().map(|h| h.weight).sum();
    (total, hits)
}

fn add(hits: &mut Vec<RuleHit>, label: impl Into<String>, weight: f32) {
    hits.push(RuleHit {
        label: label.into(),
        weight,
    });
}

fn preference_rules(
    option: &EquipmentOption,
    query: &UserQuery,
    option_text: &str,
    hits: &mut Vec<RuleHit>,
) {
    for pref in &query.preferences {
        if let Some(tag) = pref.tag.as_deref().filter(|s| !s.is_empty()) {
            let tag = tag.to_lowercase();
            let group = pref.group.as_deref().map(str::to_lowercase);
            if option.has_tag(&tag) {
                add(hits, format!("preference:tag:{tag}"), 6.0);
            }
            if option_text.contains(&tag) {
                add(hits, format!("preference:text:{tag}"), 3.0);
            }
            if option.has_tag(&tag) {
                match group.as_deref() {
                    Some("muscle") => add(hits, format!("preference:muscle-group:{tag}"), 4.0),
                    Some("goal") => add(hits, format!("preference:goal-group:{tag}"), 4.0),
                    _ => {}
                }
            }
        }
        if let Some(max_price) = pref.max_price {
            if option.price <= max_price {
                add(hits, "preference:max-price", 5.0);
            }
        }
        if let Some(min_weight) = pref.min_weight {
            if option.weight >= min_weight {
                add(hits, "preference:min-weight", 5.0);
            }
        }
    }
}

fn attribute_rules(option: &EquipmentOption, hits: &mut Vec<RuleHit>) {
    for (attr, weight) in ATTRIBUTE_BONUS {
        if option.has_attr(attr) {
            add(hits, format!("attribute:{attr}"), *weight);
        }
    }
}

fn gender_rules(
    option: &EquipmentOption,
    query: &UserQuery,
    option_text: &str,
    hits: &mut Vec<RuleHit>,
) {
    let gender = query.gender.as_deref().map(str::to_lowercase);
    match gender.as_deref() {
        Some("female") => {
            if FEMALE_FOCUS_TAGS.iter().any(|t| option.has_tag(t)) {
                add(hits, "gender:female-focus-tags", 6.0);
            }
            if FEMALE_FRIENDLY_ATTRS.iter().any(|a| option.has_attr(a)) {
                add(hits, "gender:female-friendly-attrs", 3.0);
            }
        }
        Some("male") => {
            if MALE_FOCUS_TAGS.iter().any(|t| option.has_tag(t)) {
                add(hits, "gender:male-focus-tags", 6.0);
            }
            if option_text.contains("heavy") || option.weight >= 60.0 {
                add(hits, "gender:male-heavy", 4.0);
            }
        }
        _ => {}
    }
}

fn age_rules(option: &EquipmentOption, query: &UserQuery, hits: &mut Vec<RuleHit>) {
    let Some(age) = query.age else { return };
    if age >= 50 {
        if SENIOR_SAFE_TAGS.iter().any(|t| option.has_tag(t)) {
            add(hits, "age:senior-safe-tags", 10.0);
        }
        if option.weight < 40.0 {
            add(hits, "age:senior-light-weight", 4.0);
        }
    } else if age < 18 {
        add(hits, "age:youth", 3.0);
    }
}

fn goal_rules(option: &EquipmentOption, query: &UserQuery, hits: &mut Vec<RuleHit>) {
    let Some(goal) = query.goal.as_deref() else {
        return;
    };
    let goal = goal.to_lowercase();
    let Some((_, tags)) = GOAL_TAGS.iter().find(|(g, _)| *g == goal) else {
        return;
    };
    for tag in *tags {
        if option.has_tag(tag) {
            add(hits, format!("goal:tag:{tag}"), 4.0);
        }
        if option.has_attr(tag) {
            add(hits, format!("goal:attr:{tag}"), 2.0);
        }
    }
}

fn experience_rules(option: &EquipmentOption, query: &UserQuery, hits: &mut Vec<RuleHit>) {
    let Some(experience) = query.experience.as_deref() else {
        return;
    };
    match experience.to_lowercase().as_str() {
        "beginner" => {
            if option.has_tag("beginner-friendly") {
                add(hits, "experience:beginner", 6.0);
            }
        }
        "intermediate" => {
            if option.has_tag("intermediate") {
                add(hits, "experience:intermediate", 4.0);
            }
        }
        "advanced" => {
            if option.has_tag("advanced") {
                add(hits, "experience:advanced", 4.0);
            }
        }
        "athlete" => {
            if option.has_tag("athlete") || option.weight > 80.0 {
                add(hits, "experience:athlete", 6.0);
            }
        }
        "elderly" => {
            if ELDERLY_TAGS.iter().any(|t| option.has_tag(t)) || option.has_attr("low-impact") {
                add(hits, "experience:elderly", 8.0);
            }
        }
        _ => {}
    }
}

fn profile_rules(query: &UserQuery, hits: &mut Vec<RuleHit>) {
    if query.weight.is_some_and(|w| w >= 90.0) {
        add(hits, "user:heavy-build", 3.0);
    }
    if query.height.is_some_and(|h| h >= 190.0) {
        add(hits, "user:tall", 2.0);
    }
    let user_type = query.user_type.as_deref().map(str::to_lowercase);
    match user_type.as_deref() {
        Some("athlete") => add(hits, "user-type:athlete", 3.0),
        Some("elderly") => add(hits, "user-type:elderly", 5.0),
        _ => {}
    }
}
