//! Decoded image handles.

use std::fmt;
use std::sync::Arc;

use image::{DynamicImage, GenericImageView, ImageFormat};

use super::error::FetchError;
use crate::compress::{CompressError, CompressedImage, ImageCompressor};

struct HandleInner {
    key: String,
    image: DynamicImage,
    format: Option<ImageFormat>,
    encoded_len: usize,
}

/// A successfully decoded image, ready for rendering.
///
/// Cloning is cheap: clones share the decoded pixels.
#[derive(Clone)]
pub struct ImageHandle {
    inner: Arc<HandleInner>,
}

impl ImageHandle {
    /// Decode encoded image bytes fetched for `key`.
    pub fn decode(key: &str, bytes: &[u8]) -> Result<Self, FetchError> {
        let format = image::guess_format(bytes).ok();
        let image = image::load_from_memory(bytes).map_err(|e| FetchError::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            inner: Arc::new(HandleInner {
                key: key.to_string(),
                image,
                format,
                encoded_len: bytes.len(),
            }),
        })
    }

    /// Wrap an already decoded image.
    pub fn from_image(key: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                key: key.into(),
                image,
                format: None,
                encoded_len: 0,
            }),
        }
    }

    /// The source key this image was loaded from.
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn image(&self) -> &DynamicImage {
        &self.inner.image
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.image.dimensions()
    }

    /// Container format detected from the encoded bytes, if any.
    pub fn format(&self) -> Option<ImageFormat> {
        self.inner.format
    }

    /// Size of the encoded bytes (0 when built from a decoded image).
    pub fn encoded_len(&self) -> usize {
        self.inner.encoded_len
    }

    /// Scale and re-encode the decoded image for storage in a bank.
    pub fn compress(&self, compressor: &ImageCompressor) -> Result<CompressedImage, CompressError> {
        compressor.compress(self.key(), self.image())
    }

    /// Whether two handles share the same decoded image.
    pub fn ptr_eq(&self, other: &ImageHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        f.debug_struct("ImageHandle")
            .field("key", &self.inner.key)
            .field("width", &width)
            .field("height", &height)
            .field("format", &self.inner.format)
            .finish()
    }
}
