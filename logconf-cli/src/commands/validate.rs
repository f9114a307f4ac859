//! `logconf validate` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use logconf_composer::LogConfigModule;
use logconf_core::config::LogconfConfig;
use logconf_core::types::ModuleOutput;

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `validate` command.
///
/// Loads the configuration and runs the full composition, reporting the
/// resulting record counts or the first error encountered.
///
/// # Errors
///
/// Returns the load or composition error after the report is printed, so the
/// exit code tells configuration (2) and composition (3) failures apart.
pub async fn execute(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating module configuration");

    let source = config_path.display().to_string();
    let outcome = compose(config_path).await;

    let report = match &outcome {
        Ok((config, output)) => ValidationReport::valid(source, config, output),
        Err(e) => ValidationReport::invalid(source, e),
    };

    writer.render(&report)?;

    outcome.map(|_| ())
}

async fn compose(config_path: &Path) -> Result<(LogconfConfig, ModuleOutput), CliError> {
    let config = LogconfConfig::load(config_path).await?;
    let output = LogConfigModule::new().evaluate(&config.module)?;
    Ok((config, output))
}

/// Module configuration validation report.
#[derive(Serialize)]
pub struct ValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration composes successfully
    pub valid: bool,
    /// Module name (None if the file could not be loaded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Number of declared log sources
    pub log_sources: usize,
    /// Number of composed parsers
    pub parsers: usize,
    /// Number of composed filters
    pub filters: usize,
    /// Error messages (empty if valid)
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn valid(source: String, config: &LogconfConfig, output: &ModuleOutput) -> Self {
        Self {
            source,
            valid: true,
            module: Some(config.module.name.clone()),
            log_sources: config.module.log_sources.len(),
            parsers: output.log_config_parsers.len(),
            filters: output.log_config_filters.len(),
            errors: Vec::new(),
        }
    }

    fn invalid(source: String, error: &CliError) -> Self {
        Self {
            source,
            valid: false,
            module: None,
            log_sources: 0,
            parsers: 0,
            filters: 0,
            errors: vec![error.to_string()],
        }
    }
}

impl Render for ValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Module Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
            if let Some(ref module) = self.module {
                writeln!(w, "  Module: {}", module)?;
            }
            writeln!(w, "  Log sources: {}", self.log_sources)?;
            writeln!(w, "  Parsers: {}", self.parsers)?;
            writeln!(w, "  Filters: {}", self.filters)?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
