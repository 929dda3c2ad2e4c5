//! Error types for the bedrockx CLI
//!
//! Messages are user-facing and printed as `Error: ...` by the binary.

use bedrockx_common::BedrockError;
use bedrockx_process::ProcessError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Environment configuration is invalid
    #[error("Configuration error: {0}. Check your environment variables or .env file.")]
    Config(String),

    /// Reading, writing or transforming records failed
    #[error(transparent)]
    Data(#[from] BedrockError),

    /// The concurrent processor failed
    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
