//! depsniff CLI entry point
//!
//! Parses arguments, initialises tracing, dispatches to the command
//! handlers and maps errors to process exit codes.

mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use depsniff_core::config::DepsniffConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config problems surface through the command handlers with a proper
    // exit code; logging init falls back to defaults
    let core = if cli.config.exists() {
        DepsniffConfig::load(&cli.config).await.unwrap_or_default()
    } else {
        let mut config = DepsniffConfig::default();
        config.apply_env_overrides();
        config
    };

    // Logs go to stderr so stdout stays machine-readable
    let filter = cli.log_level.as_deref().unwrap_or(&core.general.log_level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr);
    if core.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    let writer = OutputWriter::new(cli.output);
    let result = run(cli.command, &cli.config, &writer).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(
    command: Commands,
    config_path: &std::path::Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match command {
        Commands::Scan(args) => commands::scan::execute(args, config_path, writer).await,
        Commands::Config(args) => {
            commands::config::execute(args.action, config_path, writer).await
        }
    }
}
