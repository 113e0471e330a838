use std::fs;
use std::path::Path;

use tempfile::TempDir;

use fitrec_core::error::Error;
use fitrec_vector::{FlatIndex, VectorCache};

#[test]
fn missing_cache_file_is_an_empty_cache() {
    let cache = VectorCache::load(Path::new("/nonexistent/cache.json"), 4).expect("load");
    assert!(cache.is_empty());
    assert_eq!(cache.dim(), 4);
}

#[test]
fn load_drops_entries_with_wrong_dimension() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("cache.json");
    fs::write(
        &path,
        r#"{"a": [1.0, 0.0, 0.0], "b": [0.0, 1.0], "c": [0.0, 0.0, 1.0]}"#,
    )
    .expect("write cache");
    let cache = VectorCache::load(&path, 3).expect("load");
    assert_eq!(cache.len(), 2);
    assert!(cache.get("a").is_some());
    assert!(cache.get("b").is_none(), "two-element vector rejected");
}

#[test]
fn save_then_load_preserves_entries() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("cache.json");
    let mut cache = VectorCache::new(3);
    cache.insert("a".to_string(), vec![1.0, 2.0, 3.0]).expect("insert");
    cache.save(&path).expect("save");

    let loaded = VectorCache::load(&path, 3).expect("load");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get("a"), Some(&[1.0f32, 2.0, 3.0][..]));
}

#[test]
fn insert_rejects_wrong_dimension() {
    let mut cache = VectorCache::new(3);
    let err = cache.insert("a".to_string(), vec![1.0]).expect_err("must fail");
    match err.downcast_ref::<Error>() {
        Some(Error::DimensionMismatch { expected: 3, got: 1 }) => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn search_orders_by_cosine_similarity() {
    let mut cache = VectorCache::new(2);
    cache.insert("east".to_string(), vec![1.0, 0.0]).expect("insert");
    cache.insert("north".to_string(), vec![0.0, 1.0]).expect("insert");
    cache.insert("northeast".to_string(), vec![1.0, 1.0]).expect("insert");
    let index = FlatIndex::build(&cache, ["east", "north", "northeast"]);

    let hits = index.search(&[1.0, 0.0], 10).expect("search");
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].option_id, "east");
    assert!((hits[0].similarity - 1.0).abs() < 1e-6);
    assert_eq!(hits[1].option_id, "northeast");
    assert!((hits[1].similarity - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    assert_eq!(hits[2].option_id, "north");
    assert!(hits[2].similarity.abs() < 1e-6);
}

#[test]
fn search_truncates_to_k_and_breaks_ties_by_row_order() {
    let mut cache = VectorCache::new(2);
    // three identical vectors: similarity ties resolved by build order
    cache.insert("c".to_string(), vec![1.0, 0.0]).expect("insert");
    cache.insert("a".to_string(), vec![1.0, 0.0]).expect("insert");
    cache.insert("b".to_string(), vec![1.0, 0.0]).expect("insert");
    let index = FlatIndex::build(&cache, ["b", "c", "a"]);

    let hits = index.search(&[2.0, 0.0], 2).expect("search");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].option_id, "b");
    assert_eq!(hits[1].option_id, "c");
}

#[test]
fn build_excludes_ids_without_cache_entries_and_appends_strays() {
    let mut cache = VectorCache::new(2);
    cache.insert("known".to_string(), vec![1.0, 0.0]).expect("insert");
    cache.insert("stray".to_string(), vec![0.0, 1.0]).expect("insert");
    // "ghost" has no vector: excluded; "stray" is not in the order: appended
    let index = FlatIndex::build(&cache, ["known", "ghost"]);
    assert_eq!(index.len(), 2);

    let hits = index.search(&[0.0, 1.0], 10).expect("search");
    assert_eq!(hits[0].option_id, "stray");
    assert!(!hits.iter().any(|h| h.option_id == "ghost"));
}

#[test]
fn dimension_mismatch_is_a_distinguishable_error() {
    let cache = VectorCache::new(3);
    let index = FlatIndex::from_cache(&cache);
    let err = index.search(&[1.0, 0.0], 5).expect_err("must fail");
    match err.downcast_ref::<Error>() {
        Some(Error::DimensionMismatch { expected: 3, got: 2 }) => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_index_returns_no_hits() {
    let cache = VectorCache::new(2);
    let index = FlatIndex::from_cache(&cache);
    assert!(index.is_empty());
    let hits = index.search(&[1.0, 0.0], 5).expect("search");
    assert!(hits.is_empty());
}
