//! Dense-embedding index strategy.
//!
//! Chunk vectors live in a plain in-memory `Vec<Vec<f32>>` parallel to
//! the chunk sequence; search is a brute-force Euclidean scan. The
//! corpus here is one document's worth of chunks, so a flat scan beats
//! carrying an ANN structure, and the index is rebuilt each run anyway.

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use ragline_core::traits::{ChunkIndex, Embedder};
use ragline_core::types::{Chunk, SearchHit, StrategyKind};

const EMBED_BATCH_SIZE: usize = 64;

pub struct VectorIndex {
    embedder: Box<dyn Embedder>,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Embed every chunk and build the parallel vector array.
    ///
    /// The same embedder instance later embeds queries, so chunk and
    /// query vectors share a dimension by construction. Fails if the
    /// provider returns a vector count or dimension that would break
    /// the chunk/representation parallel-array invariant.
    pub fn build(chunks: &[Chunk], embedder: Box<dyn Embedder>) -> Result<Self> {
        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let embedded = embedder.embed_batch(&texts)?;
            if embedded.len() != batch.len() {
                bail!(
                    "embedder returned {} vectors for {} chunks",
                    embedded.len(),
                    batch.len()
                );
            }
            for vector in embedded {
                if vector.len() != embedder.dim() {
                    bail!(
                        "embedding dimension {} does not match embedder dim {}",
                        vector.len(),
                        embedder.dim()
                    );
                }
                vectors.push(vector);
                pb.inc(1);
            }
        }
        pb.finish_and_clear();

        info!(chunks = chunks.len(), dim = embedder.dim(), "vector index built");
        Ok(Self { embedder, vectors })
    }

    pub fn dim(&self) -> usize {
        self.embedder.dim()
    }

    /// Rank all chunk vectors by Euclidean distance to `query_vec`,
    /// ascending. Equal distances keep chunk order (stable sort).
    pub fn search_vec(&self, query_vec: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query_vec.len() != self.embedder.dim() {
            bail!(
                "query dimension {} does not match index dim {}",
                query_vec.len(),
                self.embedder.dim()
            );
        }
        let mut hits: Vec<SearchHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, vector)| SearchHit {
                index,
                score: l2_distance(query_vec, vector),
                source: StrategyKind::Dense,
            })
            .collect();
        hits.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }
}

impl ChunkIndex for VectorIndex {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Dense
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let mut embedded = self.embedder.embed_batch(&[query.to_string()])?;
        if embedded.is_empty() {
            bail!("embedder returned no vector for the query");
        }
        let query_vec = embedded.remove(0);
        self.search_vec(&query_vec, k)
    }
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
