//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

/// depsniff -- locate dependencies inside local jar archives.
///
/// Use `depsniff <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "depsniff", version, about, long_about = None)]
pub struct Cli {
    /// Path to the depsniff.toml configuration file.
    #[arg(short, long, default_value = "depsniff.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan local repositories for a dependency declared in a build report.
    Scan(ScanArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Run a dependency scan against a build tool report.
///
/// Exactly one of `--artifact` and `--package` must be given.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("criterion").required(true).args(["artifact", "package"])))]
pub struct ScanArgs {
    /// Path to the dependency report file.
    pub report: PathBuf,

    /// Artifact ID to search for (e.g. slf4j-api).
    #[arg(short, long)]
    pub artifact: Option<String>,

    /// Package name prefix to search for (e.g. org.slf4j).
    #[arg(short, long)]
    pub package: Option<String>,

    /// Report format (maven, gradle).
    #[arg(short, long, default_value = "maven")]
    pub format: String,

    /// Override the Maven local repository root.
    #[arg(long)]
    pub maven_home: Option<PathBuf>,

    /// Override the Gradle module cache root.
    #[arg(long)]
    pub gradle_home: Option<PathBuf>,

    /// Also resolve test/provided scope dependencies.
    #[arg(long)]
    pub include_test_scope: bool,

    /// Maximum number of archives scanned concurrently.
    #[arg(long)]
    pub max_workers: Option<usize>,
}

// ---- config ----

/// Manage depsniff configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, repository, scan).
        #[arg(long)]
        section: Option<String>,
    },
}
