use crate::types::VectorHit;

/// Maps text to fixed-dimension embedding vectors. A capability the serving
/// core consumes; model-backed providers plug in behind this seam.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Answers "k nearest by cosine similarity" over the full catalog embedding
/// set. Built once at startup, immutable afterwards.
pub trait VectorIndex: Send + Sync {
    fn dim(&self) -> usize;
    fn search(&self, query_vec: &[f32], k: usize) -> anyhow::Result<Vec<VectorHit>>;
}
