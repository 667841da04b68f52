//! In-memory write-through embedding cache keyed by content hash.
//!
//! Consulted before the wrapped provider and filled on misses, so a
//! text that appears in both the corpus and a query is embedded once
//! per process. Keys are blake3 hashes of the input text; the cache
//! belongs to one wrapped embedder, so the model identity never needs
//! to be part of the key.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use tracing::debug;

use ragline_core::traits::Embedder;

pub struct CachingEmbedder {
    inner: Box<dyn Embedder>,
    cache: Mutex<HashMap<String, Vec<f32>>>,
}

impl CachingEmbedder {
    pub fn new(inner: Box<dyn Embedder>) -> Self {
        Self { inner, cache: Mutex::new(HashMap::new()) }
    }

    fn content_hash(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }
}

impl Embedder for CachingEmbedder {
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn max_len(&self) -> usize {
        self.inner.max_len()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let hashes: Vec<String> = texts.iter().map(|t| Self::content_hash(t)).collect();

        let mut misses: Vec<usize> = Vec::new();
        {
            let cache = self.cache.lock().map_err(|_| anyhow::anyhow!("embedding cache poisoned"))?;
            for (i, hash) in hashes.iter().enumerate() {
                if !cache.contains_key(hash) && !misses.iter().any(|&m| hashes[m] == *hash) {
                    misses.push(i);
                }
            }
        }

        if !misses.is_empty() {
            let miss_texts: Vec<String> = misses.iter().map(|&i| texts[i].clone()).collect();
            let embedded = self.inner.embed_batch(&miss_texts)?;
            anyhow::ensure!(
                embedded.len() == miss_texts.len(),
                "provider returned {} vectors for {} texts",
                embedded.len(),
                miss_texts.len()
            );
            let mut cache = self.cache.lock().map_err(|_| anyhow::anyhow!("embedding cache poisoned"))?;
            for (&i, vector) in misses.iter().zip(embedded) {
                cache.insert(hashes[i].clone(), vector);
            }
            debug!(misses = misses.len(), total = texts.len(), "embedding cache filled");
        }

        let cache = self.cache.lock().map_err(|_| anyhow::anyhow!("embedding cache poisoned"))?;
        hashes
            .iter()
            .map(|hash| {
                cache
                    .get(hash)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("embedding missing from cache after fill"))
            })
            .collect()
    }
}
