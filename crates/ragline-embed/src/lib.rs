//! Embedding providers.
//!
//! The default provider runs an all-MiniLM-class BERT
//! sentence-transformer locally through candle, loading tokenizer,
//! config, and weights from a model directory. Setting
//! `RAG_USE_FAKE_EMBEDDINGS=1` swaps in a deterministic hashed
//! bag-of-words embedder for tests and offline development.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use serde::Deserialize;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use ragline_core::traits::Embedder;

pub mod cache;
pub mod device;
pub mod pool;
pub mod tokenize;

pub use cache::CachingEmbedder;
pub use device::select_device;
pub use pool::masked_mean_l2;
pub use tokenize::tokenize_padded;

/// Dimension of the fake embedder, matching the MiniLM hidden size so
/// either provider can back the same index configuration.
pub const DEFAULT_DIM: usize = 384;

const MAX_LEN: usize = 256;

/// The subset of the HF `config.json` the loader reads directly; the
/// full file also deserializes into candle's own `BertConfig`.
#[derive(Debug, Deserialize)]
struct ModelDims {
    hidden_size: usize,
}

pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
}

impl BertEmbedder {
    /// Load tokenizer, config, and pickled weights from `model_dir`.
    pub fn from_dir(model_dir: &Path) -> Result<Self> {
        let device = select_device();
        info!(dir = %model_dir.display(), "loading sentence-transformer model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let config_text = std::fs::read_to_string(&config_path)?;
        let config: BertConfig = serde_json::from_str(&config_text)?;
        let dims: ModelDims = serde_json::from_str(&config_text)?;

        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: std::collections::HashMap<String, Tensor> = weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        let model = BertModel::load(vb, &config)?;

        info!(dim = dims.hidden_size, "model loaded");
        Ok(Self { model, tokenizer, device, dim: dims.hidden_size })
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask) =
            tokenize_padded(&self.tokenizer, text, MAX_LEN, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let vector = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        Ok(vector)
    }
}

impl Embedder for BertEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        MAX_LEN
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }
}

/// Deterministic hashed bag-of-words vectors, L2-normalized. Good
/// enough to exercise the dense pipeline without model weights.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn hashed_vector(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        MAX_LEN
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| Ok(self.hashed_vector(t))).collect()
    }
}

/// Provider selection: the fake embedder when
/// `RAG_USE_FAKE_EMBEDDINGS=1`, otherwise the local BERT model from
/// `model_dir` (falling back to `RAG_MODEL_DIR` and the conventional
/// checkout locations).
pub fn default_embedder(model_dir: Option<&Path>) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("RAG_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        debug!("using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(DEFAULT_DIM)));
    }
    let dir = match model_dir {
        Some(dir) => dir.to_path_buf(),
        None => resolve_model_dir()?,
    };
    Ok(Box::new(BertEmbedder::from_dir(&dir)?))
}

fn resolve_model_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("RAG_MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            return Ok(p);
        }
    }
    for candidate in ["./models/all-MiniLM-L6-v2", "../models/all-MiniLM-L6-v2"] {
        let p = Path::new(candidate);
        if p.exists() {
            return Ok(p.to_path_buf());
        }
    }
    Err(anyhow!(
        "Could not locate a sentence-transformer model directory; set RAG_MODEL_DIR or RAG_USE_FAKE_EMBEDDINGS=1"
    ))
}
