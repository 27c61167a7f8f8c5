//! CLI-specific error types and exit code mapping

use dockvet_core::error::{DockvetError, RuntimeError};
use dockvet_scanner::ScannerError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from dockvet-core.
    #[error("{0}")]
    Core(#[from] DockvetError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                        |
    /// |------|------------------------------------------------|
    /// | 0    | Success                                        |
    /// | 1    | Unsupported distribution / general error       |
    /// | 2    | Configuration error                            |
    /// | 3    | Container runtime failure                      |
    /// | 5    | Vulnerability DB / history store failure       |
    /// | 10   | IO error                                       |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) => 1,
            Self::Core(core) => match core {
                DockvetError::Config(_) => 2,
                DockvetError::Runtime(RuntimeError::UnsupportedDistribution(_)) => 1,
                DockvetError::Runtime(_) => 3,
                DockvetError::Store(_) => 5,
                DockvetError::Io(_) => 10,
            },
        }
    }
}

impl From<ScannerError> for CliError {
    fn from(e: ScannerError) -> Self {
        Self::Core(e.into())
    }
}

impl From<dockvet_inventory::InventoryError> for CliError {
    fn from(e: dockvet_inventory::InventoryError) -> Self {
        Self::Core(e.into())
    }
}
