//! Record readers

use super::path::count_lines;
use crate::progress::record_progress;
use bedrockx_common::{BedrockError, FileFormat, Record, RecordKey, Result};
use serde_json::{Number, Value};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Options shared by every reader
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Explicit format; inferred from the extension when `None`
    pub format: Option<FileFormat>,
    /// Read at most this many lines (jsonl) or rows (json, csv)
    pub limit: Option<usize>,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl ReadOptions {
    pub fn format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

/// Read every record of a file
pub fn read_file(path: impl AsRef<Path>, opts: &ReadOptions) -> Result<Vec<Record>> {
    read_file_with(path, opts, Some)
}

/// Read a file, passing each record through `f`; `None` drops the record
pub fn read_file_with<T, F>(path: impl AsRef<Path>, opts: &ReadOptions, mut f: F) -> Result<Vec<T>>
where
    F: FnMut(Record) -> Option<T>,
{
    let mut out = Vec::new();
    visit_records(path.as_ref(), opts, |record| {
        if let Some(item) = f(record) {
            out.push(item);
        }
        Ok(())
    })?;
    Ok(out)
}

/// Read a file into a map keyed by `key`; later rows replace earlier ones
pub fn read_keyed(
    path: impl AsRef<Path>,
    key: &str,
    opts: &ReadOptions,
) -> Result<HashMap<RecordKey, Record>> {
    let mut out = HashMap::new();
    visit_records(path.as_ref(), opts, |record| {
        let k = RecordKey::from_record(&record, key)
            .ok_or_else(|| BedrockError::missing_key(key, &record))?;
        out.insert(k, record);
        Ok(())
    })?;
    Ok(out)
}

/// Collect the distinct values of column `key`
pub fn read_key_set(
    path: impl AsRef<Path>,
    key: &str,
    opts: &ReadOptions,
) -> Result<HashSet<RecordKey>> {
    let mut out = HashSet::new();
    visit_records(path.as_ref(), opts, |record| {
        let k = RecordKey::from_record(&record, key)
            .ok_or_else(|| BedrockError::missing_key(key, &record))?;
        out.insert(k);
        Ok(())
    })?;
    Ok(out)
}

fn visit_records<F>(path: &Path, opts: &ReadOptions, mut visit: F) -> Result<()>
where
    F: FnMut(Record) -> Result<()>,
{
    let format = match opts.format {
        Some(format) => format,
        None => FileFormat::from_path(path)?,
    };

    let mut seen = 0usize;
    let mut counting = |record: Record| {
        seen += 1;
        visit(record)
    };

    match format {
        FileFormat::Jsonl => read_jsonl(path, opts, &mut counting)?,
        FileFormat::Json => read_json(path, opts, &mut counting)?,
        FileFormat::Csv => read_csv(path, opts, &mut counting)?,
    }

    debug!(path = %path.display(), %format, records = seen, "Read file");
    Ok(())
}

fn read_jsonl<F>(path: &Path, opts: &ReadOptions, visit: &mut F) -> Result<()>
where
    F: FnMut(Record) -> Result<()>,
{
    let file = File::open(path)?;
    let total = match opts.limit {
        Some(limit) => Some(limit as u64),
        None if opts.show_progress => Some(count_lines(path)?),
        None => None,
    };
    let pb = record_progress(total, "Reading", opts.show_progress);

    let lines = BufReader::new(file)
        .lines()
        .take(opts.limit.unwrap_or(usize::MAX));

    for (line_no, line) in lines.enumerate() {
        let line = line?;
        pb.inc(1);

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line).map_err(|e| {
            BedrockError::parse(format!("{}:{}: {}", path.display(), line_no + 1, e))
        })?;
        visit(into_record(value, path)?)?;
    }

    pb.finish_and_clear();
    Ok(())
}

fn read_json<F>(path: &Path, opts: &ReadOptions, visit: &mut F) -> Result<()>
where
    F: FnMut(Record) -> Result<()>,
{
    let file = File::open(path)?;
    let root: Value = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        BedrockError::parse(format!("{}: malformed or truncated JSON: {}", path.display(), e))
    })?;

    let Value::Array(items) = root else {
        return Err(BedrockError::parse(format!(
            "{}: JSON root must be an array of objects",
            path.display()
        )));
    };

    let limit = opts.limit.unwrap_or(items.len()).min(items.len());
    let pb = record_progress(Some(limit as u64), "Reading", opts.show_progress);

    for item in items.into_iter().take(limit) {
        visit(into_record(item, path)?)?;
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(())
}

fn read_csv<F>(path: &Path, opts: &ReadOptions, visit: &mut F) -> Result<()>
where
    F: FnMut(Record) -> Result<()>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();
    let pb = record_progress(opts.limit.map(|l| l as u64), "Reading", opts.show_progress);

    for row in reader.records().take(opts.limit.unwrap_or(usize::MAX)) {
        let row = row.map_err(csv_error)?;
        // Short rows keep every header column; missing cells are null
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), row.get(i).map_or(Value::Null, infer_cell)))
            .collect();
        visit(record)?;
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(())
}

/// Type a CSV cell: empty is null, numbers become numbers, the rest strings
fn infer_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(cell.to_string())
}

fn into_record(value: Value, path: &Path) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(BedrockError::parse(format!(
            "{}: expected a JSON object, found {}",
            path.display(),
            other
        ))),
    }
}

pub(crate) fn csv_error(err: csv::Error) -> BedrockError {
    BedrockError::Csv(err.to_string())
}
