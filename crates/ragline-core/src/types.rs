//! Domain types shared by the index strategies and the retriever.

use serde::{Deserialize, Serialize};

/// A source document supplied by a [`crate::traits::DocumentSource`].
///
/// Produced once per run and immutable afterwards. `title` carries the
/// optional source metadata (page title, file stem); `content` is the raw
/// text before whitespace normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub title: Option<String>,
    pub content: String,
}

impl Document {
    pub fn new(title: Option<String>, content: impl Into<String>) -> Self {
        Self { title, content: content.into() }
    }
}

/// A bounded contiguous slice of normalized document text, the unit of
/// retrieval.
///
/// - `index`: position in the global ordered chunk sequence; stable for
///   the session and used to key the parallel index representation
/// - `content`: the normalized text window
/// - `title`: back-reference to the source document's title, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub content: String,
    pub title: Option<String>,
}

/// Indicates which index strategy produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StrategyKind {
    Dense,
    Keyword,
}

impl std::str::FromStr for StrategyKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dense" | "vector" => Ok(StrategyKind::Dense),
            "keyword" | "text" => Ok(StrategyKind::Keyword),
            other => Err(crate::error::Error::InvalidConfig(format!(
                "unknown index strategy '{other}' (expected 'dense' or 'keyword')"
            ))),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Dense => write!(f, "dense"),
            StrategyKind::Keyword => write!(f, "keyword"),
        }
    }
}

/// The minimal surface returned by both index strategies.
///
/// `index` matches `Chunk::index`. `score` is strategy-specific: L2
/// distance for the dense index (smaller is better), token-overlap
/// cardinality for the keyword index (larger is better). Results are
/// always ordered best match first, so consumers that only need the
/// ranking never look at `score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub index: usize,
    pub score: f32,
    pub source: StrategyKind,
}
