//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::ImageReader` with format sniffing |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the requested quality |

use super::backend::{BackendError, Dimensions, EncodedImage, ImageBackend};
use super::params::ResampleParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

/// Media type of every variant this backend produces.
pub const OUTPUT_MEDIA_TYPE: &str = "image/jpeg";

/// Extension → declared media type for files picked up from disk.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
];

/// Guess the declared media type of a file from its extension.
///
/// Unknown or missing extensions map to `application/octet-stream`, which the
/// ingestion stage treats as a non-image.
pub fn media_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| {
            MEDIA_TYPES
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(ext))
                .map(|(_, media_type)| *media_type)
        })
        .unwrap_or("application/octet-stream")
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode as baseline JPEG. Alpha is dropped since JPEG has no alpha channel.
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, BackendError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {e}")))?;
    Ok(bytes)
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BackendError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn dimensions(&self, image: &DynamicImage) -> Dimensions {
        Dimensions {
            width: image.width(),
            height: image.height(),
        }
    }

    fn resample(
        &self,
        image: &DynamicImage,
        params: &ResampleParams,
    ) -> Result<EncodedImage, BackendError> {
        let resized = if (image.width(), image.height()) == (params.width, params.height) {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(image.resize_exact(params.width, params.height, FilterType::Lanczos3))
        };

        let bytes = encode_jpeg(&resized, params.quality.value())?;
        Ok(EncodedImage {
            media_type: OUTPUT_MEDIA_TYPE,
            width: resized.width(),
            height: resized.height(),
            bytes,
        })
    }
}
