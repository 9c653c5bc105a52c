pub mod capture;
pub mod chain;
pub mod config;
pub mod error;
pub mod logging;
pub mod mentalmath;
pub mod models;
pub mod quotes;
pub mod tos_client;

// Re-exports for convenience
pub use config::{ChainApiConfig, QuotesConfig};
pub use error::ChainError;
pub use models::{CaptureSet, EodQuote, OptionChainTable, OptionRecord, RawChainDocument, Snapshot};
pub use quotes::QuoteClient;
pub use tos_client::TosClient;
