use fitrec_core::traits::Embedder;
use fitrec_embed::HashingEmbedder;

#[test]
fn identical_text_embeds_identically() {
    let embedder = HashingEmbedder::new(64);
    let texts = vec!["goal:weight-loss gender:female cardio".to_string()];
    let first = embedder.embed_batch(&texts).expect("embed");
    let second = embedder.embed_batch(&texts).expect("embed");
    assert_eq!(first, second);
}

#[test]
fn vectors_have_requested_dim_and_unit_norm() {
    let embedder = HashingEmbedder::new(32);
    assert_eq!(embedder.dim(), 32);
    let out = embedder
        .embed_batch(&["rowing machine cardio".to_string()])
        .expect("embed");
    assert_eq!(out[0].len(), 32);
    let norm: f32 = out[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5, "norm {norm}");
}

#[test]
fn shared_tokens_overlap_more_than_disjoint_text() {
    let embedder = HashingEmbedder::new(512);
    let out = embedder
        .embed_batch(&[
            "cardio rowing endurance".to_string(),
            "cardio rowing machine".to_string(),
            "barbell rack plates".to_string(),
        ])
        .expect("embed");
    let dot = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
    let related = dot(&out[0], &out[1]);
    let unrelated = dot(&out[0], &out[2]);
    assert!(related > unrelated, "related {related} <= unrelated {unrelated}");
}

#[test]
fn batch_preserves_input_order_and_length() {
    let embedder = HashingEmbedder::new(16);
    let texts: Vec<String> = (0..5).map(|i| format!("text number {i}")).collect();
    let out = embedder.embed_batch(&texts).expect("embed");
    assert_eq!(out.len(), 5);
    let single = embedder.embed_batch(&texts[2..3].to_vec()).expect("embed");
    assert_eq!(out[2], single[0]);
}
