//! Wikipedia document source.
//!
//! Fetches the plain-text extract of one page through the MediaWiki
//! action API (`action=query&prop=extracts&explaintext`). The response
//! nests the page under an unpredictable page-id key, so parsing walks
//! the `query.pages` object rather than deserializing a fixed struct.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::info;

use ragline_core::traits::DocumentSource;
use ragline_core::types::Document;

const DEFAULT_API_BASE: &str = "https://en.wikipedia.org/w/api.php";

pub struct WikipediaSource {
    title: String,
    api_base: String,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl WikipediaSource {
    pub fn new(title: impl Into<String>) -> Result<Self> {
        Self::with_api_base(title, DEFAULT_API_BASE)
    }

    pub fn with_api_base(title: impl Into<String>, api_base: impl Into<String>) -> Result<Self> {
        Ok(Self {
            title: title.into(),
            api_base: api_base.into(),
            client: reqwest::Client::new(),
            runtime: tokio::runtime::Runtime::new()?,
        })
    }

    async fn fetch_extract(&self) -> Result<Document> {
        let response = self
            .client
            .get(&self.api_base)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("format", "json"),
                ("titles", self.title.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.api_base))?
            .error_for_status()?;
        let body: Value = response.json().await.context("malformed Wikipedia response")?;
        parse_extract(&body, &self.title)
    }
}

impl DocumentSource for WikipediaSource {
    fn load(&self) -> Result<Vec<Document>> {
        let doc = self.runtime.block_on(self.fetch_extract())?;
        info!(
            title = doc.title.as_deref().unwrap_or("?"),
            chars = doc.content.len(),
            "fetched Wikipedia page"
        );
        Ok(vec![doc])
    }
}

/// Pull the page title and extract out of a `query.pages` response.
pub fn parse_extract(body: &Value, requested_title: &str) -> Result<Document> {
    let pages = body
        .pointer("/query/pages")
        .and_then(|v| v.as_object())
        .context("response carries no query.pages object")?;
    let page = pages
        .values()
        .next()
        .context("response carries an empty page set")?;
    if page.get("missing").is_some() {
        bail!("Wikipedia page '{}' does not exist", requested_title);
    }
    let title = page
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or(requested_title)
        .to_string();
    let extract = page
        .get("extract")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    Ok(Document::new(Some(title), extract))
}
