//! JSON-backed embedding cache keyed by option id.
//!
//! Built offline by the cache generator, read once at process start and
//! immutable at serving time. A missing file is an empty cache, not an error;
//! the engine then serves empty result lists.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use fitrec_core::error::Error;

/// `option_id -> vector[dim]`. Every stored vector has the same fixed
/// dimension; entries with the wrong length are rejected.
#[derive(Debug, Default)]
pub struct VectorCache {
    vectors: HashMap<String, Vec<f32>>,
    dim: usize,
}

impl VectorCache {
    pub fn new(dim: usize) -> Self {
        Self {
            vectors: HashMap::new(),
            dim,
        }
    }

    /// Load from a JSON object of `option_id -> [f32; dim]`. Entries whose
    /// vector length differs from `dim` are dropped with a warning.
    pub fn load(path: &Path, dim: usize) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "vector cache file missing, starting empty");
            return Ok(Self::new(dim));
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading vector cache {}", path.display()))?;
        let parsed: HashMap<String, Vec<f32>> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing vector cache {}", path.display()))?;
        let mut vectors = HashMap::with_capacity(parsed.len());
        for (id, vector) in parsed {
            if vector.len() == dim {
                vectors.insert(id, vector);
            } else {
                tracing::warn!(
                    option_id = %id,
                    got = vector.len(),
                    expected = dim,
                    "dropping cache entry with wrong dimension"
                );
            }
        }
        tracing::info!(vectors = vectors.len(), dim, path = %path.display(), "vector cache loaded");
        Ok(Self { vectors, dim })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string(&self.vectors)?;
        std::fs::write(path, raw)
            .with_context(|| format!("writing vector cache {}", path.display()))?;
        Ok(())
    }

    pub fn insert(&mut self, option_id: String, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                got: vector.len(),
            }
            .into());
        }
        self.vectors.insert(option_id, vector);
        Ok(())
    }

    pub fn get(&self, option_id: &str) -> Option<&[f32]> {
        self.vectors.get(option_id).map(Vec::as_slice)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.vectors.keys().map(String::as_str)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
