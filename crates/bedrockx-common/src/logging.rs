//! Logging Configuration and Initialization
//!
//! Centralized `tracing` setup for every bedrockx component. It supports:
//!
//! - Console output, file output, or both
//! - Human-readable text or JSON lines
//! - A global level plus extra per-module filter directives
//! - Environment-based overrides
//!
//! File output goes to one explicit log file (parent directories are
//! created), written through a non-blocking appender. The returned
//! [`LoggingGuard`] flushes pending lines when dropped, so keep it alive in
//! `main`.
//!
//! Use the `tracing` macros instead of `println!` for diagnostics:
//!
//! ```rust
//! use tracing::{info, warn};
//!
//! let path = "out.jsonl";
//! info!(path = %path, records = 3, "Saved file");
//! warn!(key = "id", "Record skipped");
//! ```
//!
//! # Example
//!
//! ```no_run
//! use bedrockx_common::logging::{init_logging, LogConfig, LogLevel};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::builder()
//!         .level(LogLevel::Debug)
//!         .build()
//!         .with_env_overrides()?;
//!     let _guard = init_logging(&config)?;
//!
//!     info!("Application started");
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry::Registry, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Default log file used when file output is enabled without an explicit path
pub const DEFAULT_LOG_FILE: &str = "./logs/bedrockx.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to tracing Level
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => anyhow::bail!(
                "unknown log level '{}' (expected trace, debug, info, warn or error)",
                s
            ),
        })
    }
}

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard error only
    #[default]
    Console,
    /// The configured log file only
    File,
    /// Console and log file
    Both,
}

impl LogOutput {
    fn console(self) -> bool {
        matches!(self, LogOutput::Console | LogOutput::Both)
    }

    fn file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::Both)
    }
}

impl std::str::FromStr for LogOutput {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "console" | "stderr" => LogOutput::Console,
            "file" => LogOutput::File,
            "both" | "all" => LogOutput::Both,
            _ => anyhow::bail!("unknown log output '{}' (expected console, file or both)", s),
        })
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            "json" => LogFormat::Json,
            _ => anyhow::bail!("unknown log format '{}' (expected text or json)", s),
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: LogLevel,

    /// Output target (console, file, or both)
    pub output: LogOutput,

    /// Log format (text or JSON)
    pub format: LogFormat,

    /// Log file path (only used when output includes file)
    pub log_file: PathBuf,

    /// Additional filter directives (e.g., "bedrockx_process=debug")
    pub filter_directives: Option<String>,

    /// Whether to include file and line number in logs
    pub include_location: bool,

    /// Whether to include thread IDs in logs
    pub include_thread_ids: bool,

    /// Whether to include target module names in logs
    pub include_targets: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            output: LogOutput::Console,
            format: LogFormat::Text,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            filter_directives: None,
            include_location: false,
            include_thread_ids: true,
            include_targets: true,
        }
    }
}

impl LogConfig {
    /// Create a new LogConfig with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply environment variables on top of this configuration
    ///
    /// Environment variables:
    /// - `BEDROCKX_LOG_LEVEL`: Log level (trace, debug, info, warn, error)
    /// - `BEDROCKX_LOG_OUTPUT`: Output target (console, file, both)
    /// - `BEDROCKX_LOG_FORMAT`: Log format (text, json)
    /// - `BEDROCKX_LOG_FILE`: Log file path
    /// - `BEDROCKX_LOG_FILTER`: Additional filter directives
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(level) = std::env::var("BEDROCKX_LOG_LEVEL") {
            self.level = level.parse()?;
        }

        if let Ok(output) = std::env::var("BEDROCKX_LOG_OUTPUT") {
            self.output = output.parse()?;
        }

        if let Ok(format) = std::env::var("BEDROCKX_LOG_FORMAT") {
            self.format = format.parse()?;
        }

        if let Ok(file) = std::env::var("BEDROCKX_LOG_FILE") {
            self.log_file = PathBuf::from(file);
        }

        if let Ok(filter) = std::env::var("BEDROCKX_LOG_FILTER") {
            self.filter_directives = Some(filter);
        }

        Ok(self)
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> LogConfigBuilder {
        LogConfigBuilder::default()
    }
}

/// Builder for LogConfig
#[derive(Default)]
pub struct LogConfigBuilder {
    config: LogConfig,
}

impl LogConfigBuilder {
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.config.output = output;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Write to this file; switches a console-only config to console and file
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = path.into();
        if self.config.output == LogOutput::Console {
            self.config.output = LogOutput::Both;
        }
        self
    }

    pub fn filter_directives(mut self, filter: impl Into<String>) -> Self {
        self.config.filter_directives = Some(filter.into());
        self
    }

    pub fn include_location(mut self, include: bool) -> Self {
        self.config.include_location = include;
        self
    }

    pub fn include_thread_ids(mut self, include: bool) -> Self {
        self.config.include_thread_ids = include;
        self
    }

    pub fn include_targets(mut self, include: bool) -> Self {
        self.config.include_targets = include;
        self
    }

    pub fn build(self) -> LogConfig {
        self.config
    }
}

/// Keeps the non-blocking file writer alive; pending lines are flushed on drop
#[must_use = "dropping the guard stops file logging"]
#[derive(Default)]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Build a subscriber for `config` without installing it
///
/// Useful for scoped logging with [`tracing::subscriber::with_default`].
pub fn build_subscriber(
    config: &LogConfig,
) -> Result<(impl Subscriber + Send + Sync + 'static, LoggingGuard)> {
    let filter = build_filter(config)?;
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_guard = None;

    if config.output.console() {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_targets)
            .with_thread_ids(config.include_thread_ids)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        layers.push(match config.format {
            LogFormat::Text => layer.boxed(),
            LogFormat::Json => layer.json().boxed(),
        });
    }

    if config.output.file() {
        let (writer, worker_guard) = file_writer(&config.log_file)?;
        file_guard = Some(worker_guard);

        let layer = fmt::layer()
            .with_writer(writer)
            .with_target(config.include_targets)
            .with_thread_ids(config.include_thread_ids)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_ansi(false);

        layers.push(match config.format {
            LogFormat::Text => layer.boxed(),
            LogFormat::Json => layer.json().boxed(),
        });
    }

    let subscriber = tracing_subscriber::registry().with(layers).with(filter);
    Ok((subscriber, LoggingGuard { _file: file_guard }))
}

/// Initialize global logging with the given configuration
///
/// Call once at startup and hold on to the returned guard.
pub fn init_logging(config: &LogConfig) -> Result<LoggingGuard> {
    let (subscriber, guard) = build_subscriber(config)?;
    subscriber
        .try_init()
        .context("Failed to install global tracing subscriber")?;
    Ok(guard)
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter> {
    let mut filter =
        EnvFilter::from_default_env().add_directive(config.level.to_tracing_level().into());

    if let Some(ref directives) = config.filter_directives {
        for directive in directives.split(',').filter(|d| !d.trim().is_empty()) {
            filter = filter.add_directive(
                directive
                    .trim()
                    .parse()
                    .context("Failed to parse filter directive")?,
            );
        }
    }

    Ok(filter)
}

fn file_writer(
    path: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no file name: {}", path.display()))?;

    std::fs::create_dir_all(&dir).context("Failed to create log directory")?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::info;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_output_and_format_from_str() {
        assert_eq!("file".parse::<LogOutput>().unwrap(), LogOutput::File);
        assert_eq!("all".parse::<LogOutput>().unwrap(), LogOutput::Both);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_builder_log_file_enables_file_output() {
        let config = LogConfig::builder()
            .level(LogLevel::Debug)
            .log_file("/tmp/bedrockx/test.log")
            .build();

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.output, LogOutput::Both);
        assert_eq!(config.log_file, PathBuf::from("/tmp/bedrockx/test.log"));

        let file_only = LogConfig::builder()
            .output(LogOutput::File)
            .log_file("x.log")
            .build();
        assert_eq!(file_only.output, LogOutput::File);
    }

    #[test]
    #[serial]
    fn test_env_overrides_builder_values() {
        std::env::set_var("BEDROCKX_LOG_LEVEL", "error");
        std::env::set_var("BEDROCKX_LOG_FORMAT", "json");

        let config = LogConfig::builder()
            .level(LogLevel::Debug)
            .include_targets(false)
            .build()
            .with_env_overrides()
            .unwrap();

        std::env::remove_var("BEDROCKX_LOG_LEVEL");
        std::env::remove_var("BEDROCKX_LOG_FORMAT");

        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.include_targets);
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_is_rejected() {
        std::env::set_var("BEDROCKX_LOG_OUTPUT", "printer");
        let result = LogConfig::from_env();
        std::env::remove_var("BEDROCKX_LOG_OUTPUT");

        assert!(result.is_err());
    }

    #[test]
    fn test_file_logging_writes_message() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("logs").join("subdir").join("test.log");

        let config = LogConfig::builder()
            .output(LogOutput::File)
            .log_file(&log_path)
            .build();

        let (subscriber, guard) = build_subscriber(&config).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            info!("Test message");
        });
        drop(guard);

        assert!(log_path.exists());
        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Test message"));
    }

    #[test]
    fn test_console_only_builds_without_file() {
        let config = LogConfig::new();
        let (subscriber, _guard) = build_subscriber(&config).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            info!("Test");
        });
    }

    #[test]
    fn test_bad_filter_directive_is_an_error() {
        let config = LogConfig::builder()
            .filter_directives("bedrockx=notalevel")
            .build();
        assert!(build_subscriber(&config).is_err());
    }
}
