//! Bounding-box downscale plus JPEG re-encode.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use super::error::CompressError;
use crate::loader::ImageHandle;
use crate::network::LoadConfig;

/// Largest encoded input accepted by [`compress_upload`] (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Default bounding box width.
pub const DEFAULT_MAX_WIDTH: u32 = 800;

/// Default bounding box height.
pub const DEFAULT_MAX_HEIGHT: u32 = 600;

/// Bounding box side used for pictures added in the bank editor.
pub const UPLOAD_MAX_DIMENSION: u32 = 1200;

/// Default encode quality, in `0.0..=1.0`.
pub const DEFAULT_QUALITY: f32 = 0.8;

const MIME_TYPE: &str = "image/jpeg";

/// Scales images into a bounding box and re-encodes them as JPEG.
///
/// Images already inside the box keep their size; larger ones shrink by a
/// single ratio so the aspect ratio is preserved.
///
/// # Example
///
/// ```
/// use eoeguess::compress::ImageCompressor;
///
/// let compressor = ImageCompressor::new(100, 100).with_quality(0.6);
///
/// assert_eq!(compressor.target_dimensions(400, 200), (100, 50));
/// assert_eq!(compressor.target_dimensions(40, 20), (40, 20));
/// assert_eq!(compressor.jpeg_quality(), 60);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageCompressor {
    max_width: u32,
    max_height: u32,
    quality: f32,
}

impl ImageCompressor {
    /// Create a compressor for the given bounding box at the default quality.
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width: max_width.max(1),
            max_height: max_height.max(1),
            quality: DEFAULT_QUALITY,
        }
    }

    /// The compressor used for pictures added in the bank editor.
    pub fn for_upload() -> Self {
        Self::new(UPLOAD_MAX_DIMENSION, UPLOAD_MAX_DIMENSION)
    }

    /// Default bounding box, quality taken from a tier's load config.
    pub fn for_tier(config: &LoadConfig) -> Self {
        Self::default().with_quality(config.quality_hint)
    }

    /// Set the encode quality. Values are clamped to `0.0..=1.0`; a
    /// non-finite value falls back to [`DEFAULT_QUALITY`].
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = if quality.is_finite() {
            quality.clamp(0.0, 1.0)
        } else {
            DEFAULT_QUALITY
        };
        self
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Quality on the JPEG encoder's 1-100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        ((self.quality * 100.0).round() as u8).max(1)
    }

    /// Output size for an input of `width` × `height`.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width <= self.max_width && height <= self.max_height {
            return (width, height);
        }

        // Compare max_width / width against max_height / height without floats
        let (width, height) = (u64::from(width), u64::from(height));
        let (max_width, max_height) = (u64::from(self.max_width), u64::from(self.max_height));
        let (target_width, target_height) = if max_width * height <= max_height * width {
            (max_width, height * max_width / width)
        } else {
            (width * max_height / height, max_height)
        };
        (target_width.max(1) as u32, target_height.max(1) as u32)
    }

    /// Scale and re-encode a decoded image.
    pub fn compress(&self, key: &str, image: &DynamicImage) -> Result<CompressedImage, CompressError> {
        let (width, height) = image.dimensions();
        let (target_width, target_height) = self.target_dimensions(width, height);

        let rgb = if (target_width, target_height) == (width, height) {
            image.to_rgb8()
        } else {
            image
                .resize_exact(target_width, target_height, FilterType::Triangle)
                .to_rgb8()
        };

        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, self.jpeg_quality());
        rgb.write_with_encoder(encoder)
            .map_err(|e| CompressError::Encode {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        debug!(
            key,
            from = %format!("{}x{}", width, height),
            to = %format!("{}x{}", target_width, target_height),
            quality = self.jpeg_quality(),
            bytes = bytes.len(),
            "Compressed image"
        );

        Ok(CompressedImage {
            bytes,
            width: target_width,
            height: target_height,
        })
    }
}

impl Default for ImageCompressor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT)
    }
}

impl fmt::Display for ImageCompressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fit {}x{}, quality {:.1}",
            self.max_width, self.max_height, self.quality
        )
    }
}

/// JPEG bytes produced by [`ImageCompressor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CompressedImage {
    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encode as a `data:` URI, the form stored in a bank's `image` field.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", MIME_TYPE, STANDARD.encode(&self.bytes))
    }
}

/// Compress a picture picked for upload.
///
/// Inputs over [`MAX_UPLOAD_BYTES`] are rejected before decoding.
pub fn compress_upload(
    key: &str,
    bytes: &[u8],
    compressor: &ImageCompressor,
) -> Result<CompressedImage, CompressError> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(CompressError::TooLarge {
            key: key.to_string(),
            size: bytes.len(),
            limit: MAX_UPLOAD_BYTES,
        });
    }

    ImageHandle::decode(key, bytes)?.compress(compressor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::FetchError;
    use crate::source::{decode_inline, SourceKind};
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    /// Busy pattern so quality visibly changes the encoded size.
    fn patterned(width: u32, height: u32) -> DynamicImage {
        let buffer = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 37) ^ (y * 11)) as u8,
                ((x * 5 + y * 13) % 251) as u8,
                ((x * y) % 253) as u8,
            ])
        });
        DynamicImage::ImageRgb8(buffer)
    }

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        patterned(width, height)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_defaults() {
        let compressor = ImageCompressor::default();
        assert_eq!(compressor.max_width(), 800);
        assert_eq!(compressor.max_height(), 600);
        assert_eq!(compressor.jpeg_quality(), 80);

        let upload = ImageCompressor::for_upload();
        assert_eq!((upload.max_width(), upload.max_height()), (1200, 1200));
        assert_eq!(upload.to_string(), "fit 1200x1200, quality 0.8");
    }

    #[test]
    fn test_for_tier_uses_quality_hint() {
        assert_eq!(ImageCompressor::for_tier(&LoadConfig::GOOD).jpeg_quality(), 80);
        assert_eq!(ImageCompressor::for_tier(&LoadConfig::MEDIUM).jpeg_quality(), 60);
        assert_eq!(ImageCompressor::for_tier(&LoadConfig::POOR).jpeg_quality(), 40);
    }

    #[test]
    fn test_quality_clamped() {
        assert_eq!(ImageCompressor::default().with_quality(1.5).jpeg_quality(), 100);
        assert_eq!(ImageCompressor::default().with_quality(-1.0).jpeg_quality(), 1);
        assert_eq!(ImageCompressor::default().with_quality(f32::NAN).jpeg_quality(), 80);
    }

    #[test]
    fn test_target_dimensions() {
        let compressor = ImageCompressor::default();
        // Width bound
        assert_eq!(compressor.target_dimensions(1600, 600), (800, 300));
        // Height bound
        assert_eq!(compressor.target_dimensions(600, 1200), (300, 600));
        // Both over, tighter ratio wins
        assert_eq!(compressor.target_dimensions(1000, 900), (666, 600));
        // Inside the box: untouched
        assert_eq!(compressor.target_dimensions(640, 480), (640, 480));
        // Extreme aspect never collapses to zero
        assert_eq!(compressor.target_dimensions(100_000, 10), (800, 1));
    }

    #[test]
    fn test_compress_downscales_to_jpeg() {
        let compressed = ImageCompressor::new(100, 100)
            .compress("wide.png", &patterned(400, 200))
            .unwrap();

        assert_eq!((compressed.width, compressed.height), (100, 50));
        assert_eq!(image::guess_format(&compressed.bytes).unwrap(), ImageFormat::Jpeg);

        let decoded = image::load_from_memory(&compressed.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (100, 50));
    }

    #[test]
    fn test_compress_never_upscales() {
        let compressed = ImageCompressor::for_upload()
            .compress("small.png", &patterned(10, 12))
            .unwrap();
        assert_eq!((compressed.width, compressed.height), (10, 12));
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let image = patterned(96, 96);
        let high = ImageCompressor::default()
            .with_quality(0.95)
            .compress("q", &image)
            .unwrap();
        let low = ImageCompressor::default()
            .with_quality(0.2)
            .compress("q", &image)
            .unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_data_uri_is_loadable_inline_key() {
        let compressed = ImageCompressor::default()
            .compress("q", &patterned(8, 8))
            .unwrap();
        let uri = compressed.to_data_uri();

        assert!(uri.starts_with("data:image/jpeg;base64,"));
        assert_eq!(SourceKind::of(&uri), SourceKind::Inline);
        assert_eq!(decode_inline(&uri).unwrap(), compressed.bytes);
    }

    #[test]
    fn test_handle_compress() {
        let bytes = encoded_png(30, 60);
        let handle = ImageHandle::decode("tall.png", &bytes).unwrap();

        let compressed = handle.compress(&ImageCompressor::new(20, 20)).unwrap();
        assert_eq!((compressed.width, compressed.height), (10, 20));
    }

    #[test]
    fn test_compress_upload() {
        let compressed =
            compress_upload("pick.png", &encoded_png(1500, 300), &ImageCompressor::for_upload())
                .unwrap();
        assert_eq!((compressed.width, compressed.height), (1200, 240));
    }

    #[test]
    fn test_compress_upload_rejects_oversized_input() {
        let bytes = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let result = compress_upload("huge.png", &bytes, &ImageCompressor::for_upload());
        assert_eq!(
            result,
            Err(CompressError::TooLarge {
                key: "huge.png".to_string(),
                size: MAX_UPLOAD_BYTES + 1,
                limit: MAX_UPLOAD_BYTES,
            })
        );
    }

    #[test]
    fn test_compress_upload_rejects_non_image() {
        let result = compress_upload("notes.txt", b"plain text", &ImageCompressor::default());
        assert!(matches!(
            result,
            Err(CompressError::Decode(FetchError::Decode { .. }))
        ));
    }
}
