//! Image compression for pictures added to a question bank.
//!
//! Pictures picked in the bank editor are scaled down to fit a bounding box
//! and re-encoded lossy before they are stored inline in the bank. The
//! encode quality follows the network tier's `quality_hint`, so banks
//! authored on a poor connection stay small.
//!
//! # Architecture
//!
//! ```text
//! compress_upload(key, bytes, compressor)
//!     │
//!     ├── bytes > MAX_UPLOAD_BYTES? ─► CompressError::TooLarge
//!     ├── ImageHandle::decode
//!     └── ImageHandle::compress(&ImageCompressor)
//!             ├── fit within max_width × max_height (downscale only)
//!             └── JPEG at the compressor's quality ─► CompressedImage
//! ```

mod compressor;
mod error;

pub use compressor::{
    compress_upload, CompressedImage, ImageCompressor, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH,
    DEFAULT_QUALITY, MAX_UPLOAD_BYTES, UPLOAD_MAX_DIMENSION,
};
pub use error::CompressError;
