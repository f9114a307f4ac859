//! `logconf render` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use logconf_composer::{FluentBitRenderer, LogConfigModule};
use logconf_core::config::LogconfConfig;
use logconf_core::types::{FilterRecord, ModuleOutput, ParserRecord};

use crate::cli::{RenderArgs, RenderSection};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `render` command.
///
/// Loads the module configuration, composes the parser and filter lists
/// and prints the requested section.
///
/// # Errors
///
/// Returns `CliError::Core` if the configuration cannot be loaded and
/// `CliError::Compose` if the module input is rejected.
pub async fn execute(
    args: RenderArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "composing log configuration");

    let config = LogconfConfig::load(config_path).await?;
    let output = LogConfigModule::new().evaluate(&config.module)?;

    let report = RenderReport::new(&config.module.name, output, args.section);
    writer.render(&report)?;

    Ok(())
}

/// Composed configuration report.
///
/// JSON output carries the record lists; text output carries the Fluent Bit
/// stanzas rendered from them.
#[derive(Serialize)]
pub struct RenderReport {
    /// Module name
    pub module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_config_parsers: Option<Vec<ParserRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_config_filters: Option<Vec<FilterRecord>>,
    #[serde(skip)]
    section: RenderSection,
    #[serde(skip)]
    parsers_text: String,
    #[serde(skip)]
    filters_text: String,
}

impl RenderReport {
    pub fn new(module: &str, output: ModuleOutput, section: RenderSection) -> Self {
        let renderer = FluentBitRenderer::new();
        let parsers_text = if section.includes_parsers() {
            renderer.render_parsers(&output.log_config_parsers)
        } else {
            String::new()
        };
        let filters_text = if section.includes_filters() {
            renderer.render_filters(&output)
        } else {
            String::new()
        };

        let ModuleOutput {
            log_config_parsers,
            log_config_filters,
        } = output;

        Self {
            module: module.to_owned(),
            log_config_parsers: section.includes_parsers().then_some(log_config_parsers),
            log_config_filters: section.includes_filters().then_some(log_config_filters),
            section,
            parsers_text,
            filters_text,
        }
    }
}

impl Render for RenderReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match self.section {
            // single sections stay redirectable into a Fluent Bit file as-is
            RenderSection::Parsers => write!(w, "{}", self.parsers_text),
            RenderSection::Filters => write!(w, "{}", self.filters_text),
            RenderSection::All => {
                writeln!(w, "# module: {}", self.module)?;
                writeln!(w)?;
                writeln!(w, "# parsers")?;
                write!(w, "{}", self.parsers_text)?;
                writeln!(w)?;
                writeln!(w, "# filters")?;
                write!(w, "{}", self.filters_text)
            }
        }
    }
}
