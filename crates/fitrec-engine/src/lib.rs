//! Hybrid ranking engine: embedding similarity fused with rule scores.
//!
//! One `RecommenderContext` is built at process start (catalog, vector index,
//! embedder) and then shared read-only across requests; `recommend` is a pure
//! function of the query against that frozen state, so any number of requests
//! can run concurrently without locking.

use anyhow::Result;
use std::collections::HashSet;

use fitrec_core::catalog::Catalog;
use fitrec_core::config::{expand_path, RecommenderSettings};
use fitrec_core::error::Error;
use fitrec_core::text;
use fitrec_core::traits::{Embedder, VectorIndex};
use fitrec_core::types::{Diagnostics, Recommendation, UserQuery};
use fitrec_vector::{FlatIndex, VectorCache};

/// Weight of the similarity term in the fused score:
/// `fused = similarity * SIMILARITY_SCALE + rule_score`.
pub const SIMILARITY_SCALE: f32 = 10.0;

pub struct RecommenderContext<VI: VectorIndex> {
    catalog: Catalog,
    index: VI,
    embedder: Box<dyn Embedder>,
    candidate_pool: usize,
    top_k: usize,
    debug: bool,
}

impl<VI: VectorIndex> std::fmt::Debug for RecommenderContext<VI> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommenderContext")
            .field("candidate_pool", &self.candidate_pool)
            .field("top_k", &self.top_k)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl<VI: VectorIndex> RecommenderContext<VI> {
    pub fn new(
        catalog: Catalog,
        index: VI,
        embedder: Box<dyn Embedder>,
        settings: &RecommenderSettings,
    ) -> Result<Self> {
        if embedder.dim() != index.dim() {
            return Err(Error::DimensionMismatch {
                expected: index.dim(),
                got: embedder.dim(),
            }
            .into());
        }
        Ok(Self {
            catalog,
            index,
            embedder,
            candidate_pool: settings.candidate_pool,
            top_k: settings.top_k,
            debug: settings.debug,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Rank the catalog against one query: embed the user text, pull the
    /// candidate pool from the index, rule-score every candidate, fuse,
    /// dedup by parent equipment and cut to `top_k`.
    ///
    /// An empty index yields an empty list; embedding or dimension failures
    /// are errors, never silently empty results.
    pub fn recommend(&self, query: &UserQuery) -> Result<Vec<Recommendation>> {
        let query = query.clone().normalized();
        let user_text = text::build_user_text(&query);
        let user_vec = self
            .embedder
            .embed_batch(&[user_text.clone()])?
            .pop()
            .ok_or_else(|| Error::Embedding("provider returned no vector".to_string()))?;

        let hits = self.index.search(&user_vec, self.candidate_pool)?;
        tracing::debug!(user_text = %user_text, candidates = hits.len(), "scoring candidates");

        let mut scored: Vec<Recommendation> = Vec::with_capacity(hits.len());
        for hit in hits {
            // Cache ids with no catalog record are silently dropped.
            let Some(option) = self.catalog.get(&hit.option_id) else {
                continue;
            };
            let (rule_score, breakdown) =
                fitrec_rules::score(option, &query, &option.preprocessed_text);
            let score = hit.similarity * SIMILARITY_SCALE + rule_score;
            let debug = self.debug.then(|| Diagnostics {
                embedding_similarity: hit.similarity * SIMILARITY_SCALE,
                rule_score,
                breakdown,
            });
            scored.push(Recommendation {
                option: option.clone(),
                score,
                debug,
            });
        }

        // Sort first so the first occurrence per equipment_id is its maximum.
        // Options without an equipment_id all share the empty key and collapse
        // into a single group; that mirrors the source system (see DESIGN.md).
        // Catalog ingestion folds empty-string ids into None, so the empty
        // key is exactly the missing-id group.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut seen: HashSet<String> = HashSet::new();
        let mut deduped: Vec<Recommendation> = Vec::new();
        for rec in scored {
            let key = rec.option.equipment_id.clone().unwrap_or_default();
            if seen.insert(key) {
                deduped.push(rec);
            }
        }
        deduped.truncate(self.top_k);
        Ok(deduped)
    }
}

/// Load catalog and cache per `settings`, build the flat index in catalog
/// order and assemble a serving context with the default embedder.
pub fn load_context(settings: &RecommenderSettings) -> Result<RecommenderContext<FlatIndex>> {
    let catalog = Catalog::load(&expand_path(&settings.catalog_path))?;
    let cache = VectorCache::load(&expand_path(&settings.cache_path), settings.embedding_dim)?;
    let index = FlatIndex::build(&cache, catalog.option_ids());
    let embedder = fitrec_embed::get_default_embedder(settings.embedding_dim);
    tracing::info!(
        options = catalog.len(),
        vectors = index.len(),
        "recommender context ready"
    );
    RecommenderContext::new(catalog, index, embedder, settings)
}
