//! Catalog ingestion: tolerant JSON loading plus per-option text precompute.
//!
//! Records that fail to deserialize (most commonly a missing id) are skipped
//! with a warning instead of failing the whole load; tag and attribute shape
//! coercion happens in the serde layer (`types::de_tags` / `types::de_attrs`).

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use crate::error::Error;
use crate::types::EquipmentOption;

/// The full equipment catalog, read once at startup and immutable afterwards.
/// Options keep their file order, which also fixes the index tie-break order.
#[derive(Debug)]
pub struct Catalog {
    options: Vec<EquipmentOption>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_options(mut options: Vec<EquipmentOption>) -> Self {
        for option in &mut options {
            option.finalize();
        }
        let by_id = options
            .iter()
            .enumerate()
            .map(|(i, o)| (o.option_id.clone(), i))
            .collect();
        Self { options, by_id }
    }

    pub fn load(path: &Path) -> Result<Self> {
        // Unlike the vector cache, a missing catalog cannot be served around.
        if !path.exists() {
            return Err(Error::NotFound(format!("catalog {}", path.display())).into());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        let mut options = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<EquipmentOption>(value) {
                Ok(option) => options.push(option),
                Err(e) => tracing::warn!(error = %e, "skipping malformed catalog record"),
            }
        }
        tracing::info!(options = options.len(), path = %path.display(), "catalog loaded");
        Ok(Self::from_options(options))
    }

    pub fn get(&self, option_id: &str) -> Option<&EquipmentOption> {
        self.by_id.get(option_id).map(|&i| &self.options[i])
    }

    pub fn options(&self) -> &[EquipmentOption] {
        &self.options
    }

    /// Option ids in catalog order; the index build uses this as its
    /// insertion order.
    pub fn option_ids(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.option_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
