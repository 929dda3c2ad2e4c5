//! bedrockx CLI - Main entry point

use bedrockx_cli::{Cli, CliConfig, Commands};
use bedrockx_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use clap::Parser;
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Verbose mode logs debug to the console; otherwise warnings only
    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let log_config = LogConfig::builder()
        .level(level)
        .output(LogOutput::Console)
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().with_env_overrides().unwrap_or(log_config);

    // The CLI works without logging, so initialization errors are ignored
    let _guard = init_logging(&log_config).ok();

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> bedrockx_cli::Result<()> {
    let config = CliConfig::from_env()?;
    let show_progress = cli.progress || config.show_progress;

    match &cli.command {
        Commands::Convert { input, output } => {
            bedrockx_cli::commands::convert::run(input, output, show_progress)
        },

        Commands::Dedup { input, output, key } => {
            bedrockx_cli::commands::dedup::run(input, output, key, show_progress)
        },

        Commands::Filter {
            input,
            output,
            key,
            values,
            exclude_file,
        } => bedrockx_cli::commands::filter::run(
            input,
            output,
            key,
            values,
            exclude_file.as_deref(),
            show_progress,
        ),

        Commands::DropColumns {
            input,
            output,
            columns,
            workers,
        } => {
            bedrockx_cli::commands::drop_columns::run(
                input,
                output,
                columns.clone(),
                workers.unwrap_or(config.workers),
                show_progress,
            )
            .await
        },
    }
}
