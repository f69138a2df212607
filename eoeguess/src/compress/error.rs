//! Compression errors.

use thiserror::Error;

use crate::loader::FetchError;

/// Errors that can occur while compressing an image.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompressError {
    /// The encoded input is over the upload limit.
    #[error("image {key} is {size} bytes, over the {limit} byte upload limit")]
    TooLarge {
        key: String,
        size: usize,
        limit: usize,
    },

    /// The input could not be decoded.
    #[error(transparent)]
    Decode(#[from] FetchError),

    /// Re-encoding the scaled image failed.
    #[error("failed to encode image {key}: {reason}")]
    Encode { key: String, reason: String },
}
