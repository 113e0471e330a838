//! Domain types shared by the rules, vector and engine crates.

use serde::{Deserialize, Deserializer, Serialize};

pub type OptionId = String;

/// A semantic label on a catalog option.
///
/// Catalog JSON carries tags either as plain strings or as `{name, group}`
/// objects; both collapse into this shape at ingestion, names and groups
/// lowercased. Anything else is skipped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// One sellable configuration of a piece of equipment.
///
/// `option_id` keys both the catalog and the vector cache. `equipment_id`
/// groups sibling options of the same parent equipment for dedup and may be
/// absent. `preprocessed_text` is the normalized concatenation of the
/// descriptive fields, attribute values and tag names, computed once at
/// catalog load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentOption {
    #[serde(alias = "id", alias = "equipment_option_id")]
    pub option_id: OptionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, deserialize_with = "de_tags")]
    pub tags: Vec<Tag>,
    #[serde(default, deserialize_with = "de_attrs")]
    pub attribute_values: Vec<String>,
    #[serde(default)]
    pub price: f32,
    #[serde(default)]
    pub weight: f32,
    #[serde(default, rename = "_preprocessed_text")]
    pub preprocessed_text: String,
}

impl EquipmentOption {
    /// Lowercase every label field and fill in the cached preprocessed text.
    /// `Catalog::from_options` runs this on every record; options built by
    /// hand must call it before scoring.
    pub fn finalize(&mut self) {
        // An empty-string equipment_id means "no parent equipment"; fold it
        // into None so the dedup key has a single missing form.
        if self.equipment_id.as_deref() == Some("") {
            self.equipment_id = None;
        }
        for tag in &mut self.tags {
            tag.name = tag.name.to_lowercase();
            if let Some(group) = tag.group.as_mut() {
                *group = group.to_lowercase();
            }
        }
        for attr in &mut self.attribute_values {
            *attr = attr.to_lowercase();
        }
        if self.preprocessed_text.is_empty() {
            self.preprocessed_text = crate::text::build_preprocessed_text(self);
        } else {
            self.preprocessed_text = self.preprocessed_text.to_lowercase();
        }
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attribute_values.iter().any(|a| a == name)
    }
}

/// A single user preference line: `tag`/`group` drive tag matching,
/// `max_price` and `min_weight` are hard thresholds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preference {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub max_price: Option<f32>,
    #[serde(default)]
    pub min_weight: Option<f32>,
}

/// One recommendation request. Every field is optional; a rule whose
/// prerequisite field is absent simply does not fire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub preferences: Vec<Preference>,
}

impl UserQuery {
    /// Lowercase every categorical field so rule matching and text building
    /// are case-insensitive.
    pub fn normalized(mut self) -> Self {
        fn lower(v: &mut Option<String>) {
            if let Some(s) = v.as_mut() {
                *s = s.to_lowercase();
            }
        }
        lower(&mut self.user_type);
        lower(&mut self.gender);
        lower(&mut self.goal);
        lower(&mut self.experience);
        for pref in &mut self.preferences {
            lower(&mut pref.tag);
            lower(&mut pref.group);
        }
        self
    }
}

/// One nearest-neighbor hit from the vector index. `similarity` is cosine,
/// higher is better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorHit {
    pub option_id: OptionId,
    pub similarity: f32,
}

/// One fired scoring rule: a stable label plus the weight it contributed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleHit {
    pub label: String,
    pub weight: f32,
}

/// Per-request scoring diagnostics, attached when the debug setting is on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    pub embedding_similarity: f32,
    pub rule_score: f32,
    pub breakdown: Vec<RuleHit>,
}

/// A catalog option augmented with its fused score for one request.
/// Ephemeral: produced per query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub option: EquipmentOption,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Diagnostics>,
}

fn de_tags<'de, D>(de: D) -> Result<Vec<Tag>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(de)?;
    Ok(raw.into_iter().filter_map(coerce_tag).collect())
}

fn coerce_tag(value: serde_json::Value) -> Option<Tag> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(Tag {
            name: s.to_lowercase(),
            group: None,
        }),
        serde_json::Value::Object(map) => {
            let name = map.get("name")?.as_str()?.to_lowercase();
            if name.is_empty() {
                return None;
            }
            let group = map
                .get("group")
                .and_then(serde_json::Value::as_str)
                .map(str::to_lowercase);
            Some(Tag { name, group })
        }
        _ => None,
    }
}

fn de_attrs<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(de)?;
    Ok(raw
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.to_lowercase()),
            _ => None,
        })
        .collect())
}
