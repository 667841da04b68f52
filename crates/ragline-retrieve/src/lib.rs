//! Strategy-agnostic retrieval and answer generation.
//!
//! The [`Retriever`] owns the session's chunk sequence and a built
//! [`ChunkIndex`]; it does not care which strategy is behind the trait.
//! Its own responsibilities are the top-k delegation and the context
//! assembly policy. [`RagEngine`] composes a retriever with a
//! [`Generator`] into the single ask-a-question path the binaries use.

use anyhow::Result;
use tracing::debug;

use ragline_core::error::Error;
use ragline_core::traits::{ChunkIndex, Generator};
use ragline_core::types::{Chunk, SearchHit};

/// Retrieved chunks are joined by a blank line, best match first.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Default number of chunks handed to the generator.
pub const DEFAULT_TOP_K: usize = 3;

/// Render the fixed prompt template. Kept stable within a session so
/// answers are reproducible under a fixed generator.
pub fn build_prompt(context: &str, query: &str) -> String {
    format!("Context: {context}\nQuestion: {query}\nAnswer:")
}

pub struct Retriever {
    chunks: Vec<Chunk>,
    index: Box<dyn ChunkIndex>,
    k: usize,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("chunks", &self.chunks)
            .field("index_len", &self.index.len())
            .field("k", &self.k)
            .finish()
    }
}

impl Retriever {
    /// Pair the chunk sequence with its index.
    ///
    /// Rejects `k == 0` and any chunks/index length divergence up
    /// front; both are configuration bugs, not runtime conditions.
    pub fn new(chunks: Vec<Chunk>, index: Box<dyn ChunkIndex>, k: usize) -> Result<Self, Error> {
        if k == 0 {
            return Err(Error::InvalidConfig("retrieval k must be positive".to_string()));
        }
        if index.len() != chunks.len() {
            return Err(Error::InvalidConfig(format!(
                "index holds {} representations for {} chunks",
                index.len(),
                chunks.len()
            )));
        }
        Ok(Self { chunks, index, k })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Top-k chunk indices for `query`, best match first. An empty
    /// corpus yields an empty result, not an error.
    pub fn retrieve(&self, query: &str) -> Result<Vec<SearchHit>> {
        let hits = self.index.search(query, self.k)?;
        debug!(query, hits = hits.len(), strategy = %self.index.kind(), "retrieved chunks");
        Ok(hits)
    }

    /// Concatenate the retrieved chunks' text in rank order.
    pub fn assemble_context(&self, hits: &[SearchHit]) -> String {
        let parts: Vec<&str> = hits
            .iter()
            .filter_map(|hit| self.chunks.get(hit.index))
            .map(|chunk| chunk.content.as_str())
            .collect();
        parts.join(CONTEXT_SEPARATOR)
    }
}

/// One answered turn: the generated text plus the hits that grounded it.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub hits: Vec<SearchHit>,
}

pub struct RagEngine {
    retriever: Retriever,
    generator: Box<dyn Generator>,
}

impl RagEngine {
    pub fn new(retriever: Retriever, generator: Box<dyn Generator>) -> Self {
        Self { retriever, generator }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Retrieve, assemble context, and generate. The generator is
    /// invoked even when retrieval comes back empty, so a bare corpus
    /// degrades to a no-context answer instead of a special case.
    pub fn answer(&self, query: &str) -> Result<Answer> {
        let hits = self.retriever.retrieve(query)?;
        let context = self.retriever.assemble_context(&hits);
        let prompt = build_prompt(&context, query);
        let text = self.generator.generate(&prompt)?;
        Ok(Answer { text, hits })
    }
}
