//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use logconf_core::config::LOG_LEVELS;

/// logconf -- Fluent Bit parser/filter composition for ECS log sources.
///
/// Use `logconf <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logconf", version, about, long_about = None)]
pub struct Cli {
    /// Path to the module configuration file (.toml, .yaml, .yml or .json).
    #[arg(short, long, default_value = "logconf.toml", global = true)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true, value_parser = PossibleValuesParser::new(LOG_LEVELS))]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fluent Bit stanzas / human-readable text.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose and print the parser and filter configuration.
    Render(RenderArgs),

    /// Validate the module configuration without printing stanzas.
    Validate,

    /// List the built-in log technologies.
    Technologies,
}

impl Commands {
    /// Whether the command reads the configuration file.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Self::Technologies)
    }
}

// ---- render ----

/// Compose and print the parser and filter configuration.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Which part of the configuration to print.
    #[arg(long, value_enum, default_value = "all")]
    pub section: RenderSection,
}

/// Part of the composed configuration to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderSection {
    /// Parsers followed by filters.
    All,
    /// Parser file content only.
    Parsers,
    /// Filter stanzas only.
    Filters,
}

impl RenderSection {
    pub fn includes_parsers(self) -> bool {
        matches!(self, Self::All | Self::Parsers)
    }

    pub fn includes_filters(self) -> bool {
        matches!(self, Self::All | Self::Filters)
    }
}
