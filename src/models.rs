use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ChainError;

/// One option-info record as returned by the provider.
///
/// No schema is enforced beyond "whatever fields the provider returned";
/// field order follows the provider document.
pub type OptionRecord = Map<String, Value>;

/// Raw option chain document from the chains API.
///
/// Both sides map expiry label -> strike label -> list of option records.
/// Expiry labels carry a trailing `:<days-to-expiry>` suffix. Any other
/// top-level provider fields (symbol, status, underlying, ...) are kept in
/// `meta` so a loaded document serializes back to the provider shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawChainDocument {
    #[serde(rename = "callExpDateMap")]
    pub calls: Map<String, Value>,

    #[serde(rename = "putExpDateMap")]
    pub puts: Map<String, Value>,

    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

/// Row-oriented table for one expiry: calls rows first, then puts rows,
/// each side in the strike order of the source document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OptionChainTable {
    pub rows: Vec<OptionRecord>,
}

impl OptionChainTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names, taken from the first row.
    pub fn columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// One capture: the label derived from the file name (extension stripped)
/// plus the document it held.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub captured_at: String,
    pub doc: RawChainDocument,
}

/// A file that could not be loaded as a capture.
#[derive(Debug)]
pub struct CaptureFailure {
    pub path: PathBuf,
    pub error: ChainError,
}

/// All captures loaded from one directory, in file-creation order, plus
/// the files that failed to load.
#[derive(Debug, Default)]
pub struct CaptureSet {
    pub snapshots: Vec<Snapshot>,
    pub failures: Vec<CaptureFailure>,
}

impl CaptureSet {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Look up the document for a capture label.
    pub fn get(&self, captured_at: &str) -> Option<&RawChainDocument> {
        self.snapshots
            .iter()
            .find(|snap| snap.captured_at == captured_at)
            .map(|snap| &snap.doc)
    }

    /// Capture labels in load order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.snapshots.iter().map(|snap| snap.captured_at.as_str())
    }
}

/// End-of-day quote reduced to the fields the analysis uses.
/// Everything else in the provider response is dropped at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EodQuote {
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,

    #[serde(rename = "previousClose")]
    pub previous_close: Option<f64>,

    pub volume: Option<f64>,

    #[serde(rename = "previousVolume")]
    pub previous_volume: Option<f64>,

    #[serde(rename = "avgTotalVolume")]
    pub avg_total_volume: Option<f64>,

    #[serde(rename = "changePercent")]
    pub change_percent: Option<f64>,
}
