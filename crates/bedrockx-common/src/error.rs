//! Error types for bedrockx

use thiserror::Error;

/// Result type alias for bedrockx operations
pub type Result<T> = std::result::Result<T, BedrockError>;

/// Main error type for file and record operations
#[derive(Error, Debug)]
pub enum BedrockError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Unsupported file format '{0}'. Supported formats: jsonl, json, csv")]
    UnsupportedFormat(String),

    #[error("Record is missing key column '{key}': {record}")]
    MissingKey { key: String, record: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl BedrockError {
    /// Create a missing-key error, rendering the offending record for context
    pub fn missing_key(key: impl Into<String>, record: &crate::Record) -> Self {
        Self::MissingKey {
            key: key.into(),
            record: serde_json::Value::Object(record.clone()).to_string(),
        }
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
