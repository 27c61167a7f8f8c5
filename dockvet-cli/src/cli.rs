//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

/// Default configuration file, used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "dockvet.toml";

/// dockvet -- container image package vulnerability scanner.
///
/// Use `dockvet <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "dockvet", version, about, long_about = None)]
pub struct Cli {
    /// Path to the dockvet.toml configuration file (default: ./dockvet.toml if present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "json")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Machine-readable JSON.
    Json,
    /// Human-readable table / text output.
    Text,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan an image or a running container for vulnerable packages.
    Scan(ScanArgs),

    /// Show stored scan results for an image.
    History(HistoryArgs),
}

// ---- scan ----

/// Scan target: exactly one of `--image` or `--container-id`.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["image", "container_id"]),
))]
pub struct ScanArgs {
    /// Image to start a temporary container from (e.g. centos:8).
    #[arg(long)]
    pub image: Option<String>,

    /// ID of an already running container (left running after the scan).
    #[arg(long)]
    pub container_id: Option<String>,
}

/// Resolved scan target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    Image(String),
    Container(String),
}

impl ScanArgs {
    pub fn target(&self) -> Option<ScanTarget> {
        match (&self.image, &self.container_id) {
            (Some(image), None) => Some(ScanTarget::Image(image.clone())),
            (None, Some(id)) => Some(ScanTarget::Container(id.clone())),
            _ => None,
        }
    }
}

// ---- history ----

/// Print every stored report for an image, oldest first.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Image name as it was scanned (e.g. centos:8).
    pub image: String,
}
