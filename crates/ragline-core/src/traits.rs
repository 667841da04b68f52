use crate::types::{Document, SearchHit, StrategyKind};

/// Supplies the documents for a run. Loaded once at startup; the
/// pipeline never goes back to the source afterwards.
pub trait DocumentSource {
    fn load(&self) -> anyhow::Result<Vec<Document>>;
}

/// Maps text to fixed-dimension vectors. One instance serves both
/// chunk indexing and query embedding, so the dimension agrees by
/// construction.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// A built chunk index: representation `i` corresponds to chunk `i`.
///
/// `search` returns at most `k` hits ordered best match first, and is
/// deterministic for a fixed chunk sequence and query.
pub trait ChunkIndex: Send + Sync {
    fn kind(&self) -> StrategyKind;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<SearchHit>>;
}

/// The language-model seam: opaque, potentially slow, potentially
/// failing. Failures propagate to the caller; no retries happen here.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
