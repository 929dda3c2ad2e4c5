//! bedrockx Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging setup, and error handling for the bedrockx workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`BedrockError`] and the crate-wide [`Result`] alias
//! - **Logging**: `tracing` subscriber setup driven by [`logging::LogConfig`]
//! - **Types**: [`Record`], [`RecordKey`] and [`FileFormat`]
//!
//! # Example
//!
//! ```no_run
//! use bedrockx_common::{FileFormat, Result};
//!
//! fn format_of(path: &str) -> Result<FileFormat> {
//!     FileFormat::from_path(path)
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{BedrockError, Result};
pub use types::{FileFormat, Record, RecordKey};
