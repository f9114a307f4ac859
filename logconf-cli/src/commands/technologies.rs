//! `logconf technologies` command handler

use std::io::Write;

use serde::Serialize;

use logconf_composer::{TechnologyRegistry, TechnologySummary};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `technologies` command.
pub fn execute(writer: &OutputWriter) -> Result<(), CliError> {
    let report = TechnologyListReport::from_registry(&TechnologyRegistry::with_defaults());
    writer.render(&report)?;
    Ok(())
}

/// Built-in technology list report.
#[derive(Serialize)]
pub struct TechnologyListReport {
    /// Number of registered technologies
    pub total: usize,
    /// Parser names and filter kinds per technology
    pub technologies: Vec<TechnologySummary>,
}

impl TechnologyListReport {
    pub fn from_registry(registry: &TechnologyRegistry) -> Self {
        let technologies = registry.summaries();
        Self {
            total: technologies.len(),
            technologies,
        }
    }
}

impl Render for TechnologyListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Technologies ({} total)", self.total.to_string().bold())?;
        writeln!(w, "{:<10} {:<8} Filters", "Key", "Parsers")?;
        writeln!(w, "{}", "-".repeat(50))?;

        for tech in &self.technologies {
            let filters = if tech.filters.is_empty() {
                "-".to_owned()
            } else {
                tech.filters.join(", ")
            };
            writeln!(
                w,
                "{:<10} {:<8} {}",
                tech.key.cyan(),
                tech.parsers.len(),
                filters
            )?;
        }

        Ok(())
    }
}
