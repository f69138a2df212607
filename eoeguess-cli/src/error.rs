//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;

use eoeguess::app::AppError;
use eoeguess::bank::BankError;
use eoeguess::compress::CompressError;
use eoeguess::config::ConfigError;
use eoeguess::logging::LoggingError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid command-line or configuration input.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Compress(#[from] CompressError),

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("Failed to create Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// One or more requested images did not load.
    #[error("{failed} of {total} image(s) failed to load")]
    LoadFailed { failed: usize, total: usize },
}
