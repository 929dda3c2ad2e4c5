//! Record filtering, deduplication and column removal

use bedrockx_common::{BedrockError, Record, RecordKey, Result};
use std::collections::HashSet;
use tracing::{info, warn};

/// Where a record's key comes from
#[derive(Clone, Copy)]
pub enum KeySource<'a> {
    /// Value of a named column
    Column(&'a str),
    /// Computed from the whole record
    With(&'a dyn Fn(&Record) -> RecordKey),
}

impl KeySource<'_> {
    /// Extract the key, or `None` when the column is missing
    pub fn key_of(&self, record: &Record) -> Option<RecordKey> {
        match self {
            KeySource::Column(column) => RecordKey::from_record(record, column),
            KeySource::With(f) => Some(f(record)),
        }
    }

    fn label(&self) -> &str {
        match self {
            KeySource::Column(column) => *column,
            KeySource::With(_) => "<key fn>",
        }
    }
}

impl std::fmt::Debug for KeySource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeySource({})", self.label())
    }
}

/// Drop every record whose key is in `exclude`.
///
/// A record without the key column is an error.
pub fn filter_records(
    data: Vec<Record>,
    exclude: &HashSet<RecordKey>,
    key: KeySource<'_>,
) -> Result<Vec<Record>> {
    let original = data.len();
    let mut kept = Vec::with_capacity(original);

    for record in data {
        let k = key
            .key_of(&record)
            .ok_or_else(|| BedrockError::missing_key(key.label(), &record))?;
        if !exclude.contains(&k) {
            kept.push(record);
        }
    }

    info!(original, filtered = kept.len(), "Filtered records");
    Ok(kept)
}

/// Keep the first record for each key.
///
/// Records without the key column are skipped with a warning.
pub fn drop_duplicates(data: Vec<Record>, key: KeySource<'_>) -> Vec<Record> {
    let original = data.len();
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(original);

    for record in data {
        let Some(k) = key.key_of(&record) else {
            warn!(key = key.label(), "Record missing key column, skipped");
            continue;
        };
        if seen.insert(k) {
            kept.push(record);
        }
    }

    info!(original, deduplicated = kept.len(), "Dropped duplicate records");
    kept
}

/// Remove `columns` from every record; absent columns are ignored
pub fn remove_columns<S: AsRef<str>>(mut data: Vec<Record>, columns: &[S]) -> Vec<Record> {
    for record in &mut data {
        strip_columns(record, columns);
    }
    data
}

/// Remove `columns` from one record, keeping the order of the rest
pub fn strip_columns<S: AsRef<str>>(record: &mut Record, columns: &[S]) {
    for column in columns {
        record.shift_remove(column.as_ref());
    }
}
