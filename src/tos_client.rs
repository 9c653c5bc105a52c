use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::{self, ChainApiConfig};
use crate::models::RawChainDocument;

// -----------------------------------------------
// CHAIN API CLIENT
// -----------------------------------------------
pub struct TosClient {
    client: Client,
    config: ChainApiConfig,
}

impl TosClient {
    pub fn new(config: ChainApiConfig) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            config,
        })
    }

    /// Fetch the latest raw option chain document for one ticker.
    pub async fn fetch_option_chain(&self, ticker: &str) -> Result<RawChainDocument> {
        let url = self.config.chains_url(ticker);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context("Request send failed")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            anyhow::bail!("Chain request failed with {}: {}", status, preview);
        }

        let text = res.text().await.context("Failed to read body")?;
        let doc: RawChainDocument =
            serde_json::from_str(&text).context("Failed to parse option chain")?;

        Ok(doc)
    }
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(config::USER_AGENT)
        .timeout(config::HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}
