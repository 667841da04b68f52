//! Chat-completions generator.
//!
//! Speaks the OpenAI-compatible `/chat/completions` shape, which also
//! covers local Ollama and most hosted inference endpoints. The bearer
//! token is optional; local endpoints don't need one.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use ragline_core::traits::Generator;

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:11434/v1".to_string(),
            model: "llama3.2".to_string(),
            api_key: None,
            temperature: 0.7,
            max_tokens: 256,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Extract the answer text from a parsed completion response.
pub fn first_choice(response: ChatResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .context("completion response carries no choices")?;
    Ok(choice.message.content)
}

pub struct ChatGenerator {
    config: GeneratorConfig,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl ChatGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Ok(Self {
            config,
            client: reqwest::Client::new(),
            runtime: tokio::runtime::Runtime::new()?,
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage { role: "user".to_string(), content: prompt.to_string() }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .context("model endpoint rejected the completion request")?;
        let parsed: ChatResponse = response.json().await.context("malformed completion response")?;
        first_choice(parsed)
    }
}

impl Generator for ChatGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.config.model, chars = prompt.len(), "requesting completion");
        self.runtime.block_on(self.complete(prompt))
    }
}

/// Prints every outgoing prompt before delegating. Wraps any
/// [`Generator`], so the debug behavior composes instead of being baked
/// into one client.
pub struct LoggingGenerator {
    inner: Box<dyn Generator>,
}

impl LoggingGenerator {
    pub fn new(inner: Box<dyn Generator>) -> Self {
        Self { inner }
    }
}

impl Generator for LoggingGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        println!("\n📤 Prompt sent to the model:\n{prompt}");
        self.inner.generate(prompt)
    }
}
