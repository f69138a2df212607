//! Application error types.

use std::fmt;

use crate::config::ConfigError;
use crate::loader::FetchError;

/// Errors that can occur while starting the image layer.
#[derive(Debug)]
pub enum AppError {
    /// Failed to build the image fetcher.
    Fetcher(FetchError),

    /// Configuration error.
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Fetcher(e) => write!(f, "Failed to create image fetcher: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Fetcher(e) => Some(e),
            AppError::Config(_) => None,
        }
    }
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        AppError::Fetcher(e)
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}
