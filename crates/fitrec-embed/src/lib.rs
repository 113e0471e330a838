//! Embedding providers.
//!
//! Model-backed providers plug in through `fitrec_core::traits::Embedder`;
//! this crate ships the deterministic token-hashing embedder used for offline
//! cache generation and tests. It is not semantically meaningful, but it is
//! stable across runs and gives shared tokens a nonzero cosine overlap, which
//! is all the serving pipeline needs to be exercised end to end.

use anyhow::Result;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use fitrec_core::traits::Embedder;

pub const DEFAULT_DIM: usize = 384;

/// Token-hashing embedder: each whitespace token lands in a bucket chosen by
/// its xxhash and the resulting vector is L2-normalized.
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in text.split_whitespace() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += 0.5 + val;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// Default provider for binaries and tests. Until a model-backed provider is
/// wired in, this is always the hashing embedder.
pub fn get_default_embedder(dim: usize) -> Box<dyn Embedder> {
    tracing::debug!(dim, "using hashing embedder");
    Box::new(HashingEmbedder::new(dim))
}
