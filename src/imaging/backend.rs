//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: decode, dimensions, and resample (resize + encode).
//!
//! Decoding is separate from resampling so a caller decodes a source once and
//! derives every variant from the same pixels. The production implementation
//! is [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate with no system libraries.

use super::params::ResampleParams;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<Dimensions> for (u32, u32) {
    fn from(d: Dimensions) -> Self {
        (d.width, d.height)
    }
}

/// An encoded raster variant, ready to be wrapped for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// MIME type of `bytes`, e.g. `image/jpeg`.
    pub media_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Trait for image processing backends.
///
/// `Image` is the backend's decoded representation. It is only ever borrowed
/// after decode, so one decoded source can feed any number of resamples.
pub trait ImageBackend {
    type Image;

    /// Decode raw file bytes into pixels.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, BackendError>;

    /// Dimensions of a decoded image.
    fn dimensions(&self, image: &Self::Image) -> Dimensions;

    /// Resample a decoded image to exact dimensions and encode it.
    fn resample(
        &self,
        image: &Self::Image,
        params: &ResampleParams,
    ) -> Result<EncodedImage, BackendError>;
}
