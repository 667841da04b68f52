//! Shared wiring for the ragline binaries: settings resolution from
//! config + flags, source construction, and index construction.

use std::path::PathBuf;

use anyhow::Result;

use ragline_core::chunker::{chunk_corpus, ChunkingConfig};
use ragline_core::config::{expand_path, Config};
use ragline_core::sources::{DirectorySource, FileSource, LiteralSource};
use ragline_core::traits::{ChunkIndex, DocumentSource};
use ragline_core::types::{Chunk, StrategyKind};
use ragline_embed::{default_embedder, CachingEmbedder};
use ragline_keyword::KeywordIndex;
use ragline_remote::{GeneratorConfig, WikipediaSource};
use ragline_retrieve::DEFAULT_TOP_K;
use ragline_vector::VectorIndex;

/// Which document source to load, resolved from config and flags.
#[derive(Debug, Clone)]
pub enum SourceSpec {
    Wikipedia { title: String },
    File { path: PathBuf },
    Dir { root: PathBuf },
    Literal { text: String },
}

/// Everything a binary needs to assemble the pipeline.
pub struct Settings {
    pub source: SourceSpec,
    pub chunking: ChunkingConfig,
    pub strategy: StrategyKind,
    pub k: usize,
    pub generator: GeneratorConfig,
    pub model_dir: Option<PathBuf>,
}

impl Settings {
    /// Read defaults from the figment config; every key has a
    /// fallback so a missing config.toml still runs.
    pub fn from_config(config: &Config) -> Result<Self> {
        let kind: String = config.get("source.kind").unwrap_or_else(|_| "wikipedia".to_string());
        let source = match kind.as_str() {
            "wikipedia" => SourceSpec::Wikipedia {
                title: config
                    .get("source.title")
                    .unwrap_or_else(|_| "Rust (programming language)".to_string()),
            },
            "file" => SourceSpec::File {
                path: expand_path(config.get::<String>("source.path").unwrap_or_else(|_| "./data/doc.txt".to_string())),
            },
            "dir" => SourceSpec::Dir {
                root: expand_path(config.get::<String>("source.path").unwrap_or_else(|_| "./data/txt".to_string())),
            },
            "literal" => SourceSpec::Literal {
                text: config.get("source.text").unwrap_or_else(|_| String::new()),
            },
            other => anyhow::bail!("unknown source.kind '{other}'"),
        };

        let chunking = ChunkingConfig {
            chunk_size: config.get("chunking.chunk_size").unwrap_or(1000),
            overlap: config.get("chunking.overlap").unwrap_or(200),
        };

        let strategy: StrategyKind = config
            .get::<String>("index.strategy")
            .unwrap_or_else(|_| "dense".to_string())
            .parse()?;

        let default_generator = GeneratorConfig::default();
        let generator = GeneratorConfig {
            api_base: config.get("llm.api_base").unwrap_or(default_generator.api_base),
            model: config.get("llm.model").unwrap_or(default_generator.model),
            api_key: config
                .get::<String>("llm.api_key")
                .ok()
                .or_else(|| std::env::var("RAG_API_KEY").ok()),
            temperature: config.get("llm.temperature").unwrap_or(default_generator.temperature),
            max_tokens: config.get("llm.max_tokens").unwrap_or(default_generator.max_tokens),
        };

        Ok(Self {
            source,
            chunking,
            strategy,
            k: config.get("retrieval.k").unwrap_or(DEFAULT_TOP_K),
            generator,
            model_dir: config.get::<String>("embed.model_dir").ok().map(expand_path),
        })
    }
}

pub fn build_source(spec: &SourceSpec) -> Result<Box<dyn DocumentSource>> {
    Ok(match spec {
        SourceSpec::Wikipedia { title } => Box::new(WikipediaSource::new(title.clone())?),
        SourceSpec::File { path } => Box::new(FileSource::new(path.clone())),
        SourceSpec::Dir { root } => Box::new(DirectorySource::new(root.clone())),
        SourceSpec::Literal { text } => Box::new(LiteralSource::new(None, text.clone())),
    })
}

pub fn load_chunks(settings: &Settings) -> Result<Vec<Chunk>> {
    settings.chunking.validate()?;
    let source = build_source(&settings.source)?;
    let documents = source.load()?;
    let chunks = chunk_corpus(&documents, &settings.chunking)?;
    Ok(chunks)
}

/// Build the configured index strategy over the chunk sequence.
pub fn build_index(settings: &Settings, chunks: &[Chunk]) -> Result<Box<dyn ChunkIndex>> {
    Ok(match settings.strategy {
        StrategyKind::Dense => {
            let embedder = default_embedder(settings.model_dir.as_deref())?;
            let cached = CachingEmbedder::new(embedder);
            Box::new(VectorIndex::build(chunks, Box::new(cached))?)
        }
        StrategyKind::Keyword => Box::new(KeywordIndex::build(chunks)?),
    })
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("RAG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// First ~`limit` characters of a chunk, on a char boundary.
pub fn snippet(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{cut}…")
}
