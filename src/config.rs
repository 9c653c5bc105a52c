use std::time::Duration;

use anyhow::{Context, Result};

// -----------------------------------------------
// CHAIN API ENDPOINTS
// -----------------------------------------------
pub const TOS_BASE_URL: &str = "https://api.tdameritrade.com";

// -----------------------------------------------
// QUOTE API ENDPOINTS
// -----------------------------------------------
pub const IEX_BASE_URL: &str = "https://sandbox.iexapis.com/stable";

/// Batch quote endpoint accepts at most this many symbols per request.
pub const QUOTE_BATCH_SIZE: usize = 100;

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const USER_AGENT: &str = concat!("tos-chains/", env!("CARGO_PKG_VERSION"));

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// -----------------------------------------------
// CAPTURE CONFIG
// -----------------------------------------------
/// File-name stamp for saved captures. Loaders treat the stem as an opaque
/// label, so the format only has to stay stable, not pretty.
pub const CAPTURE_TIME_FORMAT: &str = "%Y%m%d %H%M%S";

/// Seconds between polls in capture mode.
pub const CAPTURE_INTERVAL_SECS: u64 = 300;

// -----------------------------------------------
// CONCURRENCY LIMITS
// -----------------------------------------------
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Concurrency for capture loading, overridable via CHAINS_MAX_CONCURRENT.
pub fn get_max_concurrent() -> usize {
    if let Ok(val) = std::env::var("CHAINS_MAX_CONCURRENT") {
        if let Ok(num) = val.parse::<usize>() {
            return num.clamp(1, 64);
        }
    }
    DEFAULT_MAX_CONCURRENT
}

// -----------------------------------------------
// RUNTIME CONFIGURATION
// -----------------------------------------------

/// Chain API credentials and endpoint, passed explicitly to `TosClient`.
#[derive(Debug, Clone)]
pub struct ChainApiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ChainApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: TOS_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TOS_API_KEY").context("TOS_API_KEY is not set")?;
        Ok(Self::new(api_key))
    }

    pub fn chains_url(&self, symbol: &str) -> String {
        format!(
            "{}/v1/marketdata/chains?apikey={}&symbol={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(symbol)
        )
    }
}

/// Quote API credentials and endpoint, passed explicitly to `QuoteClient`.
#[derive(Debug, Clone)]
pub struct QuotesConfig {
    pub base_url: String,
    pub api_token: String,
}

impl QuotesConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            base_url: IEX_BASE_URL.to_string(),
            api_token: api_token.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_token = std::env::var("IEX_API_TOKEN").context("IEX_API_TOKEN is not set")?;
        Ok(Self::new(api_token))
    }

    pub fn quote_url(&self, ticker: &str) -> String {
        format!(
            "{}/stock/{}/quote?token={}",
            self.base_url,
            urlencoding::encode(ticker),
            urlencoding::encode(&self.api_token)
        )
    }

    pub fn batch_quote_url(&self, symbols: &str) -> String {
        format!(
            "{}/stock/market/batch?symbols={}&types=quote&token={}",
            self.base_url,
            urlencoding::encode(symbols),
            urlencoding::encode(&self.api_token)
        )
    }
}
