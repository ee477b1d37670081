use bookgroup_core::traits::{Embedder, VectorSource};
use bookgroup_core::types::Item;
use bookgroup_embed::{get_default_embedder, DenseSource, HashedEmbedder, HASHED_DIM};

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (a.iter().map(|x| x * x).sum::<f32>().sqrt() * b.iter().map(|x| x * x).sum::<f32>().sqrt())
}

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force fake embedder to avoid loading large model
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder(None, 256).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), HASHED_DIM);
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");
    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }

    // the source reports the embedder that was actually built, not the one asked for
    let source = DenseSource::from_embedder(get_default_embedder(None, 256).expect("embedder"));
    assert_eq!(source.name(), "hashed");
    assert_eq!(source.dim(), HASHED_DIM);
}

#[test]
fn hashed_embedder_ignores_case_and_punctuation() {
    let embedder = HashedEmbedder::default();
    let a = embedder.embed_text("Murder on the Orient Express");
    let b = embedder.embed_text("murder, on the orient express!");
    assert!((cosine(&a, &b) - 1.0).abs() < 1e-5);
    let c = embedder.embed_text("gardening for beginners");
    assert!(cosine(&a, &c) < 0.9);
}

#[test]
fn hashed_embedder_maps_empty_text_to_zero() {
    let embedder = HashedEmbedder::new(16);
    assert!(embedder.embed_text("  ...  ").iter().all(|x| *x == 0.0));
}

#[test]
fn dense_source_embeds_descriptions_in_order() {
    let source = DenseSource::new("hashed", Box::new(HashedEmbedder::new(32)));
    let items = vec![Item::new("a", "space opera"), Item::new("b", ""), Item::new("c", "space opera")];
    let vectors = source.produce_vectors(&items).expect("vectors");
    assert_eq!(source.name(), "hashed");
    assert_eq!(source.dim(), 32);
    assert_eq!(vectors.len(), 3);
    assert_eq!(vectors[0], vectors[2]);
    assert!(vectors[1].iter().all(|x| *x == 0.0));
}
