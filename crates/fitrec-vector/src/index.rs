//! Flat exact-scan cosine index.
//!
//! The catalog is small enough that an exact scan over every cached vector
//! satisfies the "k nearest by similarity" contract without an approximate
//! structure. Rows are L2-normalized at build so search is a plain dot
//! product; the index is built once at startup and never mutated.

use anyhow::Result;
use std::collections::HashSet;

use crate::cache::VectorCache;
use fitrec_core::error::Error;
use fitrec_core::traits::VectorIndex;
use fitrec_core::types::VectorHit;

pub struct FlatIndex {
    ids: Vec<String>,
    vectors: Vec<Vec<f32>>,
    dim: usize,
}

impl FlatIndex {
    /// Build from the full cache. `order` fixes row order (and thereby the
    /// tie-break order of equal similarities): ids appear in the given order
    /// first, then any remaining cache ids sorted for determinism. Ids in
    /// `order` without a cache entry are excluded from search.
    pub fn build<'a>(cache: &VectorCache, order: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ids: Vec<String> = Vec::with_capacity(cache.len());
        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(cache.len());
        let mut seen: HashSet<&str> = HashSet::with_capacity(cache.len());
        for id in order {
            if let Some(vector) = cache.get(id) {
                if seen.insert(id) {
                    ids.push(id.to_string());
                    vectors.push(l2_normalize(vector.to_vec()));
                }
            }
        }
        let mut rest: Vec<&str> = cache.ids().filter(|id| !seen.contains(*id)).collect();
        rest.sort_unstable();
        for id in rest {
            if let Some(vector) = cache.get(id) {
                ids.push(id.to_string());
                vectors.push(l2_normalize(vector.to_vec()));
            }
        }
        Self {
            ids,
            vectors,
            dim: cache.dim(),
        }
    }

    /// Build with rows in sorted-id order.
    pub fn from_cache(cache: &VectorCache) -> Self {
        Self::build(cache, std::iter::empty())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Top-k rows by cosine similarity, descending; ties keep row order
    /// (stable sort). A query of the wrong dimension is a hard error.
    pub fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<VectorHit>> {
        if query_vec.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                got: query_vec.len(),
            }
            .into());
        }
        let query = l2_normalize(query_vec.to_vec());
        let mut hits: Vec<VectorHit> = self
            .ids
            .iter()
            .zip(&self.vectors)
            .map(|(id, row)| VectorHit {
                option_id: id.clone(),
                similarity: dot(&query, row),
            })
            .collect();
        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }
}

impl VectorIndex for FlatIndex {
    fn dim(&self) -> usize {
        self.dim
    }

    fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<VectorHit>> {
        FlatIndex::search(self, query_vec, k)
    }
}

fn l2_normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
