//! HTTP JSON source.
//!
//! GETs a JSON document of game records from a configured URL. This
//! deliberately stops at structured documents — scraping any
//! particular site's HTML markup lives outside this crate, in whatever
//! produces the document.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::file::parse_games;
use super::GameSource;
use crate::types::RawGame;

pub struct HttpSource {
    http: Client,
    url: String,
    name: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("scratchev/0.1.0")
            .build()
            .context("failed to build HTTP client")?;

        let url = url.into();
        let name = format!("http:{url}");
        Ok(Self { http, url, name })
    }
}

#[async_trait]
impl GameSource for HttpSource {
    async fn fetch_games(&self) -> Result<Vec<RawGame>> {
        debug!(url = %self.url, "fetching games");

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.url))?;

        if !resp.status().is_success() {
            anyhow::bail!("{} returned {}", self.url, resp.status());
        }

        let text = resp
            .text()
            .await
            .with_context(|| format!("failed to read body from {}", self.url))?;
        parse_games(&text).with_context(|| format!("failed to parse body from {}", self.url))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
