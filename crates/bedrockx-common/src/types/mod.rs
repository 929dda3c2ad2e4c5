//! Common types used across bedrockx

use crate::error::{BedrockError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// A single structured record: one JSON object.
pub type Record = serde_json::Map<String, Value>;

/// Hashable key extracted from a record, used for keyed reads, filtering and
/// deduplication.
///
/// Values keep their JSON type, so `1` and `"1"` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    Bool(bool),
    Int(i64),
    Str(String),
    /// Any other value, keyed by its canonical JSON text
    Other(String),
}

impl RecordKey {
    /// Build a key from a JSON value
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(b) => RecordKey::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RecordKey::Int(i),
                None => RecordKey::Other(n.to_string()),
            },
            Value::String(s) => RecordKey::Str(s.clone()),
            other => RecordKey::Other(other.to_string()),
        }
    }

    /// Look up `column` in `record` and build a key from its value
    pub fn from_record(record: &Record, column: &str) -> Option<Self> {
        record.get(column).map(Self::from_value)
    }

    /// Parse user-supplied text, preferring an integer key when the text is one
    pub fn parse_loose(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(i) => RecordKey::Int(i),
            Err(_) => RecordKey::Str(text.to_string()),
        }
    }
}

impl From<i64> for RecordKey {
    fn from(value: i64) -> Self {
        RecordKey::Int(value)
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        RecordKey::Str(value.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(value: String) -> Self {
        RecordKey::Str(value)
    }
}

impl From<bool> for RecordKey {
    fn from(value: bool) -> Self {
        RecordKey::Bool(value)
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKey::Bool(b) => write!(f, "{}", b),
            RecordKey::Int(i) => write!(f, "{}", i),
            RecordKey::Str(s) => write!(f, "{}", s),
            RecordKey::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Structured file formats understood by the readers and writers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// One JSON object per line
    Jsonl,
    /// A single JSON array of objects
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl FileFormat {
    /// Infer the format from a path's extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        ext.parse()
    }

    /// Resolve an explicit format name, falling back to the path extension
    pub fn resolve(explicit: Option<&str>, path: impl AsRef<Path>) -> Result<Self> {
        match explicit {
            Some(name) => name.parse(),
            None => Self::from_path(path),
        }
    }

    /// Whether records can be appended one at a time without rewriting the file
    pub fn supports_append(self) -> bool {
        matches!(self, FileFormat::Jsonl)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileFormat::Jsonl => "jsonl",
            FileFormat::Json => "json",
            FileFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for FileFormat {
    type Err = BedrockError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "jsonl" => Ok(FileFormat::Jsonl),
            "json" => Ok(FileFormat::Json),
            "csv" => Ok(FileFormat::Csv),
            _ => Err(BedrockError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path("out/data.jsonl").unwrap(), FileFormat::Jsonl);
        assert_eq!(FileFormat::from_path("data.JSON").unwrap(), FileFormat::Json);
        assert_eq!(FileFormat::from_path("data.csv").unwrap(), FileFormat::Csv);
        assert!(FileFormat::from_path("data.txt").is_err());
        assert!(FileFormat::from_path("no_extension").is_err());
    }

    #[test]
    fn test_format_resolve_prefers_explicit() {
        let format = FileFormat::resolve(Some("jsonl"), "data.txt").unwrap();
        assert_eq!(format, FileFormat::Jsonl);

        let err = FileFormat::resolve(Some("xml"), "data.jsonl").unwrap_err();
        assert!(err.to_string().contains("'xml'"));
    }

    #[test]
    fn test_only_jsonl_supports_append() {
        assert!(FileFormat::Jsonl.supports_append());
        assert!(!FileFormat::Json.supports_append());
        assert!(!FileFormat::Csv.supports_append());
    }

    #[test]
    fn test_record_key_keeps_json_type() {
        assert_eq!(RecordKey::from_value(&json!(1)), RecordKey::Int(1));
        assert_eq!(RecordKey::from_value(&json!("1")), RecordKey::Str("1".into()));
        assert_ne!(RecordKey::from_value(&json!(1)), RecordKey::from_value(&json!("1")));
        assert_eq!(RecordKey::from_value(&json!(1.5)), RecordKey::Other("1.5".into()));
        assert_eq!(RecordKey::from_value(&json!(null)), RecordKey::Other("null".into()));
    }

    #[test]
    fn test_record_key_nested_values_use_json_text() {
        let key = RecordKey::from_value(&json!({"a": 1, "b": [true]}));
        assert_eq!(key, RecordKey::Other("{\"a\":1,\"b\":[true]}".into()));
        assert_ne!(key, RecordKey::Str("{\"a\":1,\"b\":[true]}".into()));
        assert_eq!(key.to_string(), "{\"a\":1,\"b\":[true]}");
    }

    #[test]
    fn test_record_key_parse_loose() {
        assert_eq!(RecordKey::parse_loose("42"), RecordKey::Int(42));
        assert_eq!(RecordKey::parse_loose("Bob"), RecordKey::Str("Bob".into()));
    }

    #[test]
    fn test_record_key_from_record() {
        let record = json!({"id": 7, "name": "Alice"});
        let record = record.as_object().unwrap();
        assert_eq!(RecordKey::from_record(record, "id"), Some(RecordKey::Int(7)));
        assert_eq!(RecordKey::from_record(record, "missing"), None);
    }
}
