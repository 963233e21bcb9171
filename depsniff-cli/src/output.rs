//! Output rendering for scan and config payloads
//!
//! Every subcommand produces a payload that is both `Serialize` (for
//! `--output json`, consumed by scripts) and [`Render`] (for the human
//! text report with its entry caps and section headers). [`OutputWriter`]
//! picks the representation once, so command handlers never branch on
//! the output format themselves.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Human-readable text rendering of a CLI payload.
///
/// Implementations write the full report, including truncation markers
/// like `[... N more entries]`; the writer never post-processes text.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

/// Format-switching writer for CLI payloads.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a payload to stdout in the selected format.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        self.render_to(payload, &mut stdout.lock())
    }

    /// Render a payload to an arbitrary writer.
    ///
    /// JSON output is pretty-printed with a trailing newline so piped
    /// and captured output both end cleanly.
    pub fn render_to<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => payload.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}
