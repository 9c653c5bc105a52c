use std::collections::HashMap;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::config::{self, QuotesConfig};
use crate::models::EodQuote;

/// Batch responses nest each symbol's quote one level down:
/// {"AAPL": {"quote": {...}}, ...}
#[derive(Debug, Deserialize)]
struct BatchQuoteEntry {
    quote: EodQuote,
}

// -----------------------------------------------
// QUOTE API CLIENT
// -----------------------------------------------
pub struct QuoteClient {
    client: Client,
    config: QuotesConfig,
}

impl QuoteClient {
    pub fn new(config: QuotesConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config::USER_AGENT)
            .timeout(config::HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    /// End-of-day quote for one ticker.
    pub async fn fetch_eod_quote(&self, ticker: &str) -> Result<EodQuote> {
        let url = self.config.quote_url(ticker);
        let text = self.fetch_text(&url).await?;
        serde_json::from_str(&text).context("Failed to parse quote")
    }

    /// End-of-day quotes for many tickers, batched through the provider's
    /// multi-symbol endpoint in chunks of `QUOTE_BATCH_SIZE`.
    pub async fn fetch_eod_quotes(&self, tickers: &[String]) -> Result<HashMap<String, EodQuote>> {
        let mut quotes = HashMap::with_capacity(tickers.len());

        for batch in tickers.chunks(config::QUOTE_BATCH_SIZE) {
            let symbols = batch.join(",");
            let url = self.config.batch_quote_url(&symbols);
            let text = self.fetch_text(&url).await?;

            let parsed: HashMap<String, BatchQuoteEntry> =
                serde_json::from_str(&text).context("Failed to parse batch quote response")?;
            quotes.extend(parsed.into_iter().map(|(symbol, entry)| (symbol, entry.quote)));
        }

        Ok(quotes)
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .context("Request send failed")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            anyhow::bail!("Quote request failed with {}: {}", status, preview);
        }

        res.text().await.context("Failed to read body")
    }
}
