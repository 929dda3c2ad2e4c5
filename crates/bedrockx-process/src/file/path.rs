//! Path helpers

use bedrockx_common::Result;
use std::io::Read;
use std::path::{Path, PathBuf};

const COUNT_BUFFER_SIZE: usize = 1024 * 1024;

/// Build a sibling file name with `suffix` inserted before the extension.
///
/// Only the file name is returned; the directory part is dropped.
///
/// ```
/// use bedrockx_process::file::add_file_suffix;
/// use std::path::PathBuf;
///
/// assert_eq!(add_file_suffix("dir/data.jsonl", "response", "_"), PathBuf::from("data_response.jsonl"));
/// ```
pub fn add_file_suffix(path: impl AsRef<Path>, suffix: &str, sep: &str) -> PathBuf {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    PathBuf::from(format!("{stem}{sep}{suffix}{ext}"))
}

/// Count newline bytes without loading the file into memory
pub fn count_lines(path: impl AsRef<Path>) -> Result<u64> {
    let mut file = std::fs::File::open(path)?;
    let mut buffer = vec![0u8; COUNT_BUFFER_SIZE];
    let mut lines = 0u64;

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        lines += buffer[..bytes_read].iter().filter(|&&b| b == b'\n').count() as u64;
    }

    Ok(lines)
}
