//! Structured file reading and writing
//!
//! Formats are picked explicitly or inferred from the path extension:
//! `jsonl`, `json` (root array of objects) and `csv` (header row).

mod path;
mod reader;
mod writer;

pub use path::{add_file_suffix, count_lines};
pub use reader::{read_file, read_file_with, read_key_set, read_keyed, ReadOptions};
pub use writer::{append_to_jsonl, save_file, JsonlAppender, SaveOptions};
