use ragline_core::traits::{ChunkIndex, Embedder};
use ragline_core::types::{Chunk, StrategyKind};
use ragline_embed::FakeEmbedder;
use ragline_vector::VectorIndex;

fn chunks_from(texts: &[&str]) -> Vec<Chunk> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| Chunk { index, content: (*text).to_string(), title: None })
        .collect()
}

/// Maps known texts to fixed 2-d points so distances are exact.
struct StubEmbedder;

impl Embedder for StubEmbedder {
    fn dim(&self) -> usize {
        2
    }

    fn max_len(&self) -> usize {
        16
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| match t.as_str() {
                "origin" => vec![0.0, 0.0],
                "near" => vec![1.0, 0.0],
                "far" => vec![10.0, 0.0],
                _ => vec![5.0, 5.0],
            })
            .collect())
    }
}

#[test]
fn index_length_matches_chunk_sequence() {
    let chunks = chunks_from(&["one", "two", "three", "four", "five"]);
    let index = VectorIndex::build(&chunks, Box::new(FakeEmbedder::new(64))).expect("build");
    assert_eq!(index.len(), chunks.len(), "parallel arrays must agree in length");
    assert_eq!(index.kind(), StrategyKind::Dense);
}

#[test]
fn search_orders_by_distance_ascending() {
    let chunks = chunks_from(&["far", "near", "origin"]);
    let index = VectorIndex::build(&chunks, Box::new(StubEmbedder)).expect("build");

    let hits = index.search("origin", 3).expect("search");
    let ranked: Vec<usize> = hits.iter().map(|h| h.index).collect();
    assert_eq!(ranked, vec![2, 1, 0]);
    assert_eq!(hits[0].score, 0.0);
    assert_eq!(hits[1].score, 1.0);
    assert_eq!(hits[2].score, 10.0);
}

#[test]
fn fewer_chunks_than_k_returns_all_of_them() {
    let chunks = chunks_from(&["near", "far"]);
    let index = VectorIndex::build(&chunks, Box::new(StubEmbedder)).expect("build");

    let hits = index.search("origin", 3).expect("search");
    assert_eq!(hits.len(), 2, "k=3 over 2 chunks yields exactly 2 hits");
}

#[test]
fn never_more_than_k_results() {
    let chunks = chunks_from(&["one", "two", "three", "four", "five", "six"]);
    let index = VectorIndex::build(&chunks, Box::new(FakeEmbedder::new(32))).expect("build");

    let hits = index.search("one", 4).expect("search");
    assert_eq!(hits.len(), 4);
}

#[test]
fn equal_distances_keep_chunk_order() {
    let chunks = chunks_from(&["near", "near", "near"]);
    let index = VectorIndex::build(&chunks, Box::new(StubEmbedder)).expect("build");

    let hits = index.search("origin", 3).expect("search");
    let ranked: Vec<usize> = hits.iter().map(|h| h.index).collect();
    assert_eq!(ranked, vec![0, 1, 2]);
}

#[test]
fn query_dimension_mismatch_is_rejected() {
    let chunks = chunks_from(&["near"]);
    let index = VectorIndex::build(&chunks, Box::new(StubEmbedder)).expect("build");
    assert!(index.search_vec(&[1.0, 2.0, 3.0], 1).is_err());
}

#[test]
fn empty_corpus_builds_an_empty_index() {
    let index = VectorIndex::build(&[], Box::new(StubEmbedder)).expect("build");
    assert!(index.is_empty());
    assert!(index.search("origin", 3).expect("search").is_empty());
}

#[test]
fn repeated_searches_are_deterministic() {
    let chunks = chunks_from(&["alpha beta", "beta gamma", "gamma delta"]);
    let index = VectorIndex::build(&chunks, Box::new(FakeEmbedder::new(64))).expect("build");

    let first = index.search("beta", 3).expect("search");
    let again = index.search("beta", 3).expect("search");
    let a: Vec<usize> = first.iter().map(|h| h.index).collect();
    let b: Vec<usize> = again.iter().map(|h| h.index).collect();
    assert_eq!(a, b);
}
