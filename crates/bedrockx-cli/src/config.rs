//! Environment configuration for the bedrockx CLI

use crate::error::{CliError, Result};

/// Worker pool size when neither `--workers` nor `BEDROCKX_WORKERS` is set
pub const DEFAULT_WORKERS: usize = 4;

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Default worker count for `drop-columns`
    pub workers: usize,

    /// Draw progress bars even without `--progress`
    pub show_progress: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            show_progress: false,
        }
    }
}

impl CliConfig {
    /// Load config from environment variables
    ///
    /// - `BEDROCKX_WORKERS`: positive worker count
    /// - `BEDROCKX_PROGRESS`: `1`, `true`, `yes` or `on` enables progress bars
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(workers) = std::env::var("BEDROCKX_WORKERS") {
            config.workers = match workers.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(CliError::config(format!(
                        "BEDROCKX_WORKERS must be a positive integer, got '{}'",
                        workers
                    )))
                },
            };
        }

        if let Ok(progress) = std::env::var("BEDROCKX_PROGRESS") {
            config.show_progress = matches!(
                progress.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("BEDROCKX_WORKERS");
        std::env::remove_var("BEDROCKX_PROGRESS");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        assert_eq!(CliConfig::from_env().unwrap(), CliConfig::default());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("BEDROCKX_WORKERS", "12");
        std::env::set_var("BEDROCKX_PROGRESS", "TRUE");

        let config = CliConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.workers, 12);
        assert!(config.show_progress);
    }

    #[test]
    #[serial]
    fn test_invalid_workers() {
        clear_env();
        for bad in ["0", "-3", "many"] {
            std::env::set_var("BEDROCKX_WORKERS", bad);
            let err = CliConfig::from_env().unwrap_err();
            assert!(err.to_string().contains(bad));
        }
        clear_env();
    }
}
