//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env
//! vars. Provides a helper to expand `~` and `${VAR}` in configured paths.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Typed settings for the recommendation engine, read from the
/// `[recommender]` table. Every field has a default so a bare process still
/// serves.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommenderSettings {
    /// Path to the equipment catalog JSON array.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    /// Path to the vector cache JSON object (`option_id -> [f32]`).
    #[serde(default = "default_cache_path")]
    pub cache_path: String,
    /// Embedding dimension D; every cached vector and query vector must match.
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,
    /// Candidate pool fetched from the index before rule scoring and dedup.
    #[serde(default = "default_candidate_pool")]
    pub candidate_pool: usize,
    /// Final result cutoff after fusion and dedup.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Attach per-rule diagnostics to every recommendation.
    #[serde(default)]
    pub debug: bool,
}

fn default_catalog_path() -> String {
    "data/equipment_options.json".to_string()
}
fn default_cache_path() -> String {
    "data/equipment_vector_cache.json".to_string()
}
fn default_embedding_dim() -> usize {
    384
}
fn default_candidate_pool() -> usize {
    1000
}
fn default_top_k() -> usize {
    100
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            cache_path: default_cache_path(),
            embedding_dim: default_embedding_dim(),
            candidate_pool: default_candidate_pool(),
            top_k: default_top_k(),
            debug: false,
        }
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        Ok(Self { figment })
    }

    /// Extract the `[recommender]` table, falling back to defaults when the
    /// table is absent entirely. A table that is present but malformed is an
    /// `Error::InvalidConfig`, not a silent fallback.
    pub fn settings(&self) -> anyhow::Result<RecommenderSettings> {
        if self.figment.find_value("recommender").is_ok() {
            self.figment.extract_inner("recommender").map_err(|e| {
                crate::error::Error::InvalidConfig(format!("recommender settings: {e}")).into()
            })
        } else {
            Ok(RecommenderSettings::default())
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
