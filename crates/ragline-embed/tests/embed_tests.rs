use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ragline_core::traits::Embedder;
use ragline_embed::{default_embedder, CachingEmbedder, FakeEmbedder, DEFAULT_DIM};

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force the fake embedder to avoid loading model weights
    std::env::set_var("RAG_USE_FAKE_EMBEDDINGS", "1");

    let embedder = default_embedder(None).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), DEFAULT_DIM, "embedding dim is {DEFAULT_DIM}");

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn fake_embedder_distinguishes_texts() {
    let embedder = FakeEmbedder::new(64);
    let embs = embedder
        .embed_batch(&["alpha beta".to_string(), "gamma delta".to_string()])
        .expect("embed_batch");
    assert_ne!(embs[0], embs[1], "different token bags map to different vectors");
}

/// Counts how many texts actually reach the wrapped provider.
struct CountingEmbedder {
    inner: FakeEmbedder,
    calls: Arc<AtomicUsize>,
}

impl Embedder for CountingEmbedder {
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn max_len(&self) -> usize {
        self.inner.max_len()
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.embed_batch(texts)
    }
}

#[test]
fn caching_embedder_embeds_each_distinct_text_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counting = CountingEmbedder { inner: FakeEmbedder::new(32), calls: Arc::clone(&calls) };
    let cached = CachingEmbedder::new(Box::new(counting));

    let corpus = vec!["one".to_string(), "two".to_string(), "one".to_string()];
    let first = cached.embed_batch(&corpus).expect("embed_batch");
    assert_eq!(first.len(), 3);
    assert_eq!(first[0], first[2], "identical texts share a vector");
    assert_eq!(calls.load(Ordering::SeqCst), 2, "duplicates within a batch hit the cache");

    // A repeat batch is served entirely from cache
    let again = cached.embed_batch(&corpus).expect("embed_batch");
    assert_eq!(again, first);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // A query seen during indexing costs nothing extra
    let query = vec!["two".to_string()];
    cached.embed_batch(&query).expect("embed_batch");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn caching_embedder_preserves_dim_and_max_len() {
    let cached = CachingEmbedder::new(Box::new(FakeEmbedder::new(48)));
    assert_eq!(cached.dim(), 48);
    assert!(cached.max_len() > 0);
}
