//! `depsniff config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use depsniff_core::config::DepsniffConfig;

use crate::cli::ConfigAction;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    action: ConfigAction,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match action {
        ConfigAction::Validate => {
            let config = DepsniffConfig::load(config_path)
                .await
                .map_err(|e| CliError::Config(e.to_string()))?;
            config
                .validate()
                .map_err(|e| CliError::Config(e.to_string()))?;

            writer.render(&ValidateOutput {
                path: config_path.display().to_string(),
                valid: true,
            })?;
        }
        ConfigAction::Show { section } => {
            let config = effective_config(config_path).await?;
            let output = build_show_output(&config, section.as_deref())?;
            writer.render(&output)?;
        }
    }
    Ok(())
}

/// Load the effective config: file if present, otherwise defaults, with
/// env overrides applied either way.
async fn effective_config(path: &Path) -> Result<DepsniffConfig, CliError> {
    if path.exists() {
        DepsniffConfig::load(path)
            .await
            .map_err(|e| CliError::Config(e.to_string()))
    } else {
        let mut config = DepsniffConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

fn build_show_output(
    config: &DepsniffConfig,
    section: Option<&str>,
) -> Result<ShowOutput, CliError> {
    let full = serde_json::to_value(config)?;
    let value = match section {
        None => full,
        Some(name) => full
            .get(name)
            .cloned()
            .ok_or_else(|| {
                CliError::Command(format!(
                    "unknown section: {name} (expected: general, repository, scan)"
                ))
            })?,
    };
    Ok(ShowOutput {
        section: section.map(str::to_owned),
        config: value,
    })
}

#[derive(Serialize)]
pub struct ValidateOutput {
    pub path: String,
    pub valid: bool,
}

impl Render for ValidateOutput {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;
        writeln!(w, "{} {}", "Configuration OK:".green().bold(), self.path)?;
        Ok(())
    }
}

#[derive(Serialize)]
pub struct ShowOutput {
    pub section: Option<String>,
    pub config: serde_json::Value,
}

impl Render for ShowOutput {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if let Some(section) = &self.section {
            writeln!(w, "[{section}]")?;
        }
        let rendered = toml::to_string_pretty(&self.config).map_err(std::io::Error::other)?;
        write!(w, "{rendered}")?;
        Ok(())
    }
}
