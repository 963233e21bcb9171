//! CLI-specific error types and exit code mapping

use depsniff_core::error::DepsniffError;
use depsniff_scanner::ScannerError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// The dependency report could not be parsed.
    #[error("report error: {0}")]
    Report(String),

    /// The scan run failed as a whole (worker pool errors and the like).
    #[error("scan error: {0}")]
    Scan(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from depsniff-core.
    #[error("{0}")]
    Core(#[from] DepsniffError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                          |
    /// |------|----------------------------------|
    /// | 0    | Success (matches found or not)   |
    /// | 1    | General / command error          |
    /// | 2    | Configuration error              |
    /// | 3    | Malformed dependency report      |
    /// | 4    | Scan run failed                  |
    /// | 10   | IO error                         |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Report(_) => 3,
            Self::Scan(_) => 4,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<ScannerError> for CliError {
    fn from(e: ScannerError) -> Self {
        match e {
            ScannerError::MalformedReport { .. } => Self::Report(e.to_string()),
            ScannerError::Config { .. } => Self::Config(e.to_string()),
            _ => Self::Scan(e.to_string()),
        }
    }
}
