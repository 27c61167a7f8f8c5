//! dockvet -- container image package vulnerability scanner
//!
//! Parses CLI arguments, loads configuration, initializes logging on stderr
//! and dispatches to the subcommand handlers in [`commands`].

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;

use dockvet_core::config::DockvetConfig;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG_PATH};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            let code = u8::try_from(e.exit_code()).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli).await?;

    logging::init_tracing(&config.general, cli.log_level.as_deref())
        .map_err(|e| CliError::Config(e.to_string()))?;

    tracing::debug!(
        vuln_db = %config.store.vuln_db_path,
        history = %config.store.history_path,
        "configuration loaded"
    );

    let writer = OutputWriter::new(cli.output);
    match cli.command {
        Commands::Scan(args) => commands::scan::execute(args, &config, &writer).await,
        Commands::History(args) => commands::history::execute(args, &config, &writer),
    }
}

/// An explicit `--config` must exist; the default path falls back to built-in defaults.
async fn load_config(cli: &Cli) -> Result<DockvetConfig, CliError> {
    let config = match &cli.config {
        Some(path) => DockvetConfig::load(path).await?,
        None => DockvetConfig::load_or_default(DEFAULT_CONFIG_PATH).await?,
    };
    Ok(config)
}
