//! Network collaborators: the Wikipedia document source and the
//! chat-completions generator.
//!
//! Both hold a private tokio runtime and `block_on` their HTTP calls,
//! keeping the trait seams synchronous; the pipeline itself stays
//! single-threaded and blocking. Failures carry context and propagate
//! to the caller; no retries happen at this layer.

pub mod generate;
pub mod wikipedia;

pub use generate::{ChatGenerator, GeneratorConfig, LoggingGenerator};
pub use wikipedia::WikipediaSource;
