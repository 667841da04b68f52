//! Keyword-overlap index strategy.
//!
//! Each chunk is reduced to the set of its lowercase word tokens
//! (maximal `\w+` runs); a query scores against a chunk as the plain
//! cardinality of the token intersection. No TF-IDF, no length
//! normalization. Ties are broken by original chunk order, which keeps
//! the ranking deterministic.

use std::collections::HashSet;

use anyhow::Result;
use regex::Regex;
use tracing::debug;

use ragline_core::traits::ChunkIndex;
use ragline_core::types::{Chunk, SearchHit, StrategyKind};

pub struct KeywordIndex {
    token_re: Regex,
    token_sets: Vec<HashSet<String>>,
}

impl KeywordIndex {
    /// Build the token-set representation for an ordered chunk
    /// sequence. Representation `i` is derived from chunk `i`.
    pub fn build(chunks: &[Chunk]) -> Result<Self> {
        let token_re = Regex::new(r"\w+")?;
        let token_sets: Vec<HashSet<String>> =
            chunks.iter().map(|c| tokenize(&token_re, &c.content)).collect();
        debug!(chunks = token_sets.len(), "keyword index built");
        Ok(Self { token_re, token_sets })
    }
}

impl ChunkIndex for KeywordIndex {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Keyword
    }

    fn len(&self) -> usize {
        self.token_sets.len()
    }

    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let query_tokens = tokenize(&self.token_re, query);
        let mut hits: Vec<SearchHit> = self
            .token_sets
            .iter()
            .enumerate()
            .map(|(index, tokens)| SearchHit {
                index,
                score: tokens.intersection(&query_tokens).count() as f32,
                source: StrategyKind::Keyword,
            })
            .filter(|hit| hit.score > 0.0)
            .collect();
        // Stable sort: equal scores keep ascending chunk order
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }
}

fn tokenize(re: &Regex, text: &str) -> HashSet<String> {
    re.find_iter(text).map(|m| m.as_str().to_lowercase()).collect()
}
