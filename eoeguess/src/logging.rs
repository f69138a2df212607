//! Logging setup.
//!
//! Console output goes to stderr so command output stays pipeable. When a
//! log directory is configured, a daily-rotated file is written through a
//! non-blocking appender; the returned [`WorkerGuard`] must be kept alive
//! until shutdown or buffered lines are lost.

use std::path::{Path, PathBuf};

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::fmt::{self, time::LocalTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub use tracing_appender::non_blocking::WorkerGuard;

/// Prefix for rotated log files (`eoeguess.log.YYYY-MM-DD`).
pub const LOG_FILE_PREFIX: &str = "eoeguess.log";

/// Errors that can occur while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{directive}': {reason}")]
    Filter { directive: String, reason: String },

    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    Init(String),
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. Returns the file writer guard
/// when `directory` is given.
pub fn init(level: &str, directory: Option<&Path>) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directive) if !directive.trim().is_empty() => build_filter(&directive)?,
        _ => build_filter(level)?,
    };

    let console = fmt::layer()
        .with_timer(LocalTime::new(Rfc3339))
        .with_writer(std::io::stderr);

    match directory {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| LoggingError::CreateDir {
                path: dir.to_path_buf(),
                source: e,
            })?;

            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = fmt::layer()
                .with_timer(LocalTime::new(Rfc3339))
                .with_ansi(false)
                .with_writer(writer);

            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file)
                .try_init()
                .map_err(|e| LoggingError::Init(e.to_string()))?;

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .try_init()
                .map_err(|e| LoggingError::Init(e.to_string()))?;

            Ok(None)
        }
    }
}

/// Parse a filter directive such as `info` or `eoeguess=debug,warn`.
pub fn build_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|e| LoggingError::Filter {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}
