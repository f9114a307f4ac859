//! logconf -- compose Fluent Bit parser and filter configuration for ECS log sources.
//!
//! Reads a module configuration (`logconf.toml` by default), composes the
//! parsers and filters for each log source and prints them as Fluent Bit
//! stanzas or JSON.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use logconf_core::config::{GeneralConfig, LogconfConfig};

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let general = effective_general(&cli).await;
    if let Err(e) = logging::init_tracing(&general) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }

    tracing::debug!(config = %cli.config.display(), "logconf starting");

    let writer = OutputWriter::new(cli.output);
    let result = match cli.command {
        Commands::Render(args) => commands::render::execute(args, &cli.config, &writer).await,
        Commands::Validate => commands::validate::execute(&cli.config, &writer).await,
        Commands::Technologies => commands::technologies::execute(&writer),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

/// Resolve the logging settings before the command runs.
///
/// Precedence: `--log-level` flag, then `LOGCONF_GENERAL_*` environment
/// variables, then the `[general]` section of the config file, then defaults.
/// A config file that fails to load falls back to defaults here; the command
/// itself reports the failure.
async fn effective_general(cli: &Cli) -> GeneralConfig {
    let mut config = if cli.command.needs_config() {
        LogconfConfig::from_file(&cli.config)
            .await
            .unwrap_or_default()
    } else {
        LogconfConfig::default()
    };
    config.apply_env_overrides();

    let mut general = config.general;
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    general
}
