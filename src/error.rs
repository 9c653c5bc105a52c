use std::fmt;

#[derive(Debug)]
pub enum ChainError {
    SchemaMismatch(String),
    MalformedLabel(String),
    ExpiryNotFound(String),
    MalformedRecord(String),
    CaptureRead(String),
    CaptureWrite(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::SchemaMismatch(msg) => write!(f, "Schema mismatch: {}", msg),
            ChainError::MalformedLabel(label) => write!(f, "Malformed expiry label: {}", label),
            ChainError::ExpiryNotFound(expiry) => write!(f, "Expiry not found: {}", expiry),
            ChainError::MalformedRecord(strike) => write!(f, "Malformed record at strike: {}", strike),
            ChainError::CaptureRead(msg) => write!(f, "Capture read error: {}", msg),
            ChainError::CaptureWrite(msg) => write!(f, "Capture write error: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}
