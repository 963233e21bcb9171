//! `depsniff scan` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use depsniff_core::config::DepsniffConfig;
use depsniff_scanner::{
    DependencyScanner, ReportFormat, ScanReport, ScannerConfig, SearchCriterion,
};

use crate::cli::ScanArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// How many matched entries to print per archive in text mode.
const MAX_ENTRIES_SHOWN: usize = 3;

/// Execute the `scan` command.
pub async fn execute(
    args: ScanArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let core = load_config(config_path).await?;

    let format = ReportFormat::from_str_loose(&args.format).ok_or_else(|| {
        CliError::Command(format!(
            "invalid report format: {} (expected: maven, gradle)",
            args.format
        ))
    })?;

    // Core config provides defaults, CLI flags override per run
    let mut scanner_config = ScannerConfig::from_core(&core);
    scanner_config.report_format = format;
    if let Some(home) = &args.maven_home {
        scanner_config.maven_home = home.display().to_string();
    }
    if let Some(home) = &args.gradle_home {
        scanner_config.gradle_home = home.display().to_string();
    }
    if args.include_test_scope {
        scanner_config.include_test_scope = true;
    }
    if let Some(workers) = args.max_workers {
        scanner_config.max_workers = workers;
    }

    let criterion = match (args.artifact, args.package) {
        (Some(artifact), _) => SearchCriterion::Artifact(artifact),
        (_, Some(package)) => SearchCriterion::PackagePrefix(package),
        _ => {
            return Err(CliError::Command(
                "either --artifact or --package is required".to_owned(),
            ));
        }
    };

    let report_meta = tokio::fs::metadata(&args.report).await?;
    if report_meta.len() > core.scan.max_report_size as u64 {
        return Err(CliError::Report(format!(
            "report file exceeds {} bytes",
            core.scan.max_report_size
        )));
    }
    let report_content = tokio::fs::read_to_string(&args.report).await?;

    info!(
        report = %args.report.display(),
        criterion = %criterion,
        "starting dependency scan"
    );

    let mut scanner = DependencyScanner::builder()
        .config(scanner_config)
        .criterion(criterion.clone())
        .build()?;
    let scan_report = scanner.scan(&report_content).await?;

    let output = build_output(&criterion, scan_report);
    writer.render(&output)?;

    // A scan with zero matches is still a successful scan
    Ok(())
}

/// Load the core config, falling back to defaults when the file is absent.
async fn load_config(path: &Path) -> Result<DepsniffConfig, CliError> {
    if path.exists() {
        DepsniffConfig::load(path)
            .await
            .map_err(|e| CliError::Config(e.to_string()))
    } else {
        let mut config = DepsniffConfig::default();
        config.apply_env_overrides();
        config
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(config)
    }
}

/// Flatten the engine report into a renderable payload.
fn build_output(criterion: &SearchCriterion, report: ScanReport) -> ScanOutput {
    ScanOutput {
        criterion: criterion.to_string(),
        matches: report
            .matches
            .into_iter()
            .map(|m| MatchEntry {
                coordinate: m.artifact.coordinate.to_string(),
                path: m.artifact.path.display().to_string(),
                entries: m.matched_entries,
            })
            .collect(),
        unresolved: report.unresolved.iter().map(|c| c.to_string()).collect(),
        failures: report
            .failures
            .into_iter()
            .map(|f| FailureEntry {
                coordinate: f.artifact.coordinate.to_string(),
                path: f.artifact.path.display().to_string(),
                reason: f.reason,
            })
            .collect(),
        warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
    }
}

#[derive(Serialize)]
pub struct ScanOutput {
    pub criterion: String,
    pub matches: Vec<MatchEntry>,
    pub unresolved: Vec<String>,
    pub failures: Vec<FailureEntry>,
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
pub struct MatchEntry {
    pub coordinate: String,
    pub path: String,
    pub entries: Vec<String>,
}

#[derive(Serialize)]
pub struct FailureEntry {
    pub coordinate: String,
    pub path: String,
    pub reason: String,
}

impl Render for ScanOutput {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Search: {}", self.criterion.bold())?;
        writeln!(w)?;

        if self.matches.is_empty() {
            writeln!(w, "{}", "No matches found.".yellow())?;
        } else {
            writeln!(
                w,
                "{}",
                format!("Found in {} archive(s):", self.matches.len())
                    .green()
                    .bold()
            )?;
            for m in &self.matches {
                writeln!(w, "  {} ({})", m.coordinate.bold(), m.path)?;
                for entry in m.entries.iter().take(MAX_ENTRIES_SHOWN) {
                    writeln!(w, "    {}", entry)?;
                }
                if m.entries.len() > MAX_ENTRIES_SHOWN {
                    writeln!(
                        w,
                        "    [... {} more entries]",
                        m.entries.len() - MAX_ENTRIES_SHOWN
                    )?;
                }
            }
        }

        if !self.unresolved.is_empty() {
            writeln!(w)?;
            writeln!(
                w,
                "{}",
                format!("Not in local repositories ({}):", self.unresolved.len()).yellow()
            )?;
            for coordinate in &self.unresolved {
                writeln!(w, "  {}", coordinate)?;
            }
        }

        if !self.failures.is_empty() {
            writeln!(w)?;
            writeln!(
                w,
                "{}",
                format!("Failed to scan ({}):", self.failures.len()).red()
            )?;
            for f in &self.failures {
                writeln!(w, "  {} ({}): {}", f.coordinate, f.path, f.reason)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(w)?;
            writeln!(w, "Report warnings ({}):", self.warnings.len())?;
            for warning in &self.warnings {
                writeln!(w, "  {}", warning)?;
            }
        }

        Ok(())
    }
}
