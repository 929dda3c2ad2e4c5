//! Record writers

use super::reader::csv_error;
use bedrockx_common::{BedrockError, FileFormat, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options for [`save_file`]
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Explicit format; inferred from the extension when `None`
    pub format: Option<FileFormat>,
    /// Spaces per indentation level for `json` output
    pub json_indent: usize,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            format: None,
            json_indent: 4,
        }
    }
}

impl SaveOptions {
    pub fn format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn json_indent(mut self, indent: usize) -> Self {
        self.json_indent = indent;
        self
    }
}

/// Write `data` to `path`, replacing any existing file.
///
/// Parent directories are created as needed.
pub fn save_file<T: Serialize>(path: impl AsRef<Path>, data: &[T], opts: &SaveOptions) -> Result<()> {
    let path = path.as_ref();
    let format = match opts.format {
        Some(format) => format,
        None => FileFormat::from_path(path)?,
    };

    create_parent_dir(path)?;
    let mut writer = BufWriter::new(File::create(path)?);

    match format {
        FileFormat::Jsonl => {
            for item in data {
                serde_json::to_writer(&mut writer, item)?;
                writer.write_all(b"\n")?;
            }
        },
        FileFormat::Json => {
            let indent = " ".repeat(opts.json_indent);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
            data.serialize(&mut serializer)?;
            writer.write_all(b"\n")?;
        },
        FileFormat::Csv => write_csv(&mut writer, data)?,
    }

    writer.flush()?;
    info!(path = %path.display(), %format, records = data.len(), "Saved file");
    Ok(())
}

fn write_csv<W: Write, T: Serialize>(writer: W, data: &[T]) -> Result<()> {
    let rows = data
        .iter()
        .map(|item| match serde_json::to_value(item)? {
            Value::Object(map) => Ok(map),
            other => Err(BedrockError::parse(format!(
                "CSV rows must be objects, found {}",
                other
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    // Header is the union of keys in first-seen order
    let mut seen: HashSet<&String> = HashSet::new();
    let headers: Vec<String> = rows
        .iter()
        .flat_map(|row| row.keys())
        .filter(|k| seen.insert(*k))
        .cloned()
        .collect();

    let mut csv_writer = csv::Writer::from_writer(writer);
    if !rows.is_empty() {
        csv_writer.write_record(&headers).map_err(csv_error)?;
    }

    for row in &rows {
        let cells = headers.iter().map(|h| match row.get(h) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        });
        csv_writer.write_record(cells).map_err(csv_error)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Appends one record per line to a `jsonl` file.
///
/// The file and its parent directories are created on open. Every append is
/// issued as a single write of the full line and is visible to readers as
/// soon as the call returns.
#[derive(Debug)]
pub struct JsonlAppender {
    path: PathBuf,
    file: File,
}

impl JsonlAppender {
    /// Open `path` for appending
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        create_parent_dir(&path)?;
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(path = %path.display(), "Opened jsonl appender");
        Ok(Self { path, file })
    }

    /// Serialize `value` onto a single line and append it
    pub fn append_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let line = serde_json::to_string(value)?;
        self.append_line(&line)
    }

    /// Append pre-rendered text as one line
    pub fn append_line(&mut self, line: &str) -> Result<()> {
        if line.contains('\n') {
            return Err(BedrockError::parse("jsonl lines cannot contain newlines"));
        }
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        self.file.write_all(buf.as_bytes())?;
        Ok(())
    }

    /// Flush file contents to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Append one value to a `jsonl` file, creating it if needed
pub fn append_to_jsonl<T: Serialize + ?Sized>(path: impl Into<PathBuf>, value: &T) -> Result<()> {
    JsonlAppender::open(path)?.append_json(value)
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::file::{read_file, ReadOptions};
    use bedrockx_common::Record;
    use serde_json::json;

    fn sample_data() -> Vec<Record> {
        vec![
            json!({"id": 1, "name": "Alice", "age": 25}),
            json!({"id": 2, "name": "Bob", "age": 30}),
            json!({"id": 3, "name": "Charlie", "age": 35}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
    }

    #[test]
    fn test_save_and_read_each_format() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["output.jsonl", "output.json", "output.csv"] {
            let path = dir.path().join(name);
            save_file(&path, &sample_data(), &SaveOptions::default()).unwrap();

            let records = read_file(&path, &ReadOptions::default()).unwrap();
            assert_eq!(records, sample_data(), "format of {name}");
        }
    }

    #[test]
    fn test_save_json_uses_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        save_file(&path, &sample_data(), &SaveOptions::default().json_indent(2)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": 1"));
    }

    #[test]
    fn test_save_csv_header_is_key_union() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let data = vec![json!({"id": 1, "name": "Alice"}), json!({"id": 2, "city": "LA"})];
        save_file(&path, &data, &SaveOptions::default()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,name,city"));
        assert_eq!(lines.next(), Some("1,Alice,"));
        assert_eq!(lines.next(), Some("2,,LA"));
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subdir").join("output.jsonl");
        save_file(&path, &sample_data(), &SaveOptions::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_empty_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        save_file::<Record>(&path, &[], &SaveOptions::default()).unwrap();

        assert!(path.exists());
        assert!(read_file(&path, &ReadOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_save_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.unknown");
        let err = save_file(&path, &sample_data(), &SaveOptions::default()).unwrap_err();
        assert!(matches!(err, BedrockError::UnsupportedFormat(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_appender_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("log.jsonl");

        append_to_jsonl(&path, &json!({"id": 1, "name": "Alice"})).unwrap();
        let mut appender = JsonlAppender::open(&path).unwrap();
        appender.append_json(&json!({"id": 2})).unwrap();
        appender.append_line("{\"id\": 3}").unwrap();
        appender.sync().unwrap();

        let records = read_file(&path, &ReadOptions::default()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["name"], json!("Alice"));
    }

    #[test]
    fn test_appender_rejects_multiline_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut appender = JsonlAppender::open(dir.path().join("x.jsonl")).unwrap();
        assert!(appender.append_line("a\nb").is_err());
    }
}
