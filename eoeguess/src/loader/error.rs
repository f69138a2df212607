//! Error types for image loading.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by a single fetch.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// A local image file could not be read.
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    /// The bytes were fetched but are not a decodable image.
    #[error("failed to decode image {key}: {reason}")]
    Decode { key: String, reason: String },

    /// The fetcher does not handle this kind of source key.
    #[error("unsupported image source {key}: {reason}")]
    Unsupported { key: String, reason: String },
}

/// Why one attempt of a load failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AttemptFailure {
    /// The attempt did not finish within the tier's timeout.
    #[error("timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    /// The fetch finished with an error.
    #[error(transparent)]
    Fetch(FetchError),
}

impl AttemptFailure {
    pub fn is_timeout(&self) -> bool {
        matches!(self, AttemptFailure::TimedOut(_))
    }
}

/// Errors returned by [`ImageLoader`](super::ImageLoader).
///
/// Neither variant is fatal to the game: callers show a network message for
/// `Connectivity` and skip the image for `Load`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoaderError {
    /// The host was offline when an attempt was about to start. Not retried.
    #[error("network is offline, cannot load {key}")]
    Connectivity { key: String },

    /// Every allowed attempt failed.
    #[error("failed to load {key} after {attempts} attempt(s): {last_failure}")]
    Load {
        key: String,
        attempts: u32,
        last_failure: AttemptFailure,
    },
}

impl LoaderError {
    /// The source key the failed load was for.
    pub fn key(&self) -> &str {
        match self {
            LoaderError::Connectivity { key } => key,
            LoaderError::Load { key, .. } => key,
        }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, LoaderError::Connectivity { .. })
    }
}
