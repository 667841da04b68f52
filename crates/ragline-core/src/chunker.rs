//! Sliding-window chunker over normalized text.
//!
//! The chunker owns normalization: raw source text goes in, runs of
//! whitespace collapse to a single space and the ends are trimmed, and
//! the window slides over the resulting character sequence. Window
//! arithmetic is in characters, never bytes, so multi-byte text cannot
//! be split mid-scalar.

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

/// Window geometry for [`chunk_text`].
///
/// `overlap` must stay below `chunk_size`; an equal or larger overlap
/// would stop the window from advancing.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, overlap: 200 }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        let config = Self { chunk_size, overlap };
        config.validate()?;
        Ok(config)
    }

    /// Fatal-configuration check, run before any processing.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be positive".to_string()));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

/// Collapse consecutive whitespace to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `text` into overlapping fixed-size windows.
///
/// Adjacent chunks share exactly `overlap` characters; the final chunk
/// may be shorter than `chunk_size`. The loop stops as soon as a chunk
/// reaches the end of the text, so no trailing overlap-only fragment is
/// emitted. Empty (or whitespace-only) input yields an empty sequence.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<String>> {
    config.validate()?;
    let normalized = normalize_whitespace(text);
    let chars: Vec<char> = normalized.chars().collect();
    if chars.is_empty() {
        return Ok(Vec::new());
    }

    let mut windows = Vec::new();
    let mut start = 0usize;
    loop {
        let end = (start + config.chunk_size).min(chars.len());
        windows.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += config.step();
    }
    Ok(windows)
}

/// Chunk one document, assigning indices starting at `base_index`.
pub fn chunk_document(doc: &Document, config: &ChunkingConfig, base_index: usize) -> Result<Vec<Chunk>> {
    let chunks = chunk_text(&doc.content, config)?
        .into_iter()
        .enumerate()
        .map(|(offset, content)| Chunk {
            index: base_index + offset,
            content,
            title: doc.title.clone(),
        })
        .collect();
    Ok(chunks)
}

/// Chunk a whole corpus into one ordered sequence with global indices.
///
/// The sequence is the session's unit of truth: index `i` here must
/// always line up with representation `i` in whichever index gets built.
pub fn chunk_corpus(docs: &[Document], config: &ChunkingConfig) -> Result<Vec<Chunk>> {
    config.validate()?;
    let mut all_chunks = Vec::new();
    for doc in docs {
        let chunks = chunk_document(doc, config, all_chunks.len())?;
        all_chunks.extend(chunks);
    }
    debug!(
        documents = docs.len(),
        chunks = all_chunks.len(),
        chunk_size = config.chunk_size,
        overlap = config.overlap,
        "chunked corpus"
    );
    Ok(all_chunks)
}
