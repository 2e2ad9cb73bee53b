//! Shared test utilities for the coverbox test suite.
//!
//! Provides synthetic in-memory images for backend tests and [`RawItem`]
//! builders for batch tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bytes = synthetic_jpeg(300, 450);
//! let item = RawItem::new("Saga_1.jpg", "image/jpeg", bytes);
//!
//! // Declared size without allocating it
//! let huge = raw_item("huge.jpg", "image/jpeg", 6 * 1024 * 1024);
//! ```

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

use crate::types::{ItemBytes, RawItem};

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

/// A gradient JPEG of the given size.
pub fn synthetic_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(gradient_rgb(width, height)),
        ImageFormat::Jpeg,
    )
}

/// A half-transparent PNG of the given size.
pub fn synthetic_png_rgba(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| Rgba([200, (x % 256) as u8, 40, 128]));
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// A lossless WebP of the given size.
pub fn synthetic_webp(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(gradient_rgb(width, height)),
        ImageFormat::WebP,
    )
}

// =========================================================================
// Raw items
// =========================================================================

/// An item with a declared type and size. The bytes are a short placeholder,
/// so only use this where decoding is mocked or never reached.
pub fn raw_item(name: &str, content_type: &str, size: u64) -> RawItem {
    RawItem {
        name: name.to_string(),
        content_type: content_type.to_string(),
        size,
        bytes: ItemBytes::Loaded(vec![0xFF, 0xD8, 0xFF, 0xD9]),
    }
}

/// A small declared JPEG for mocked batch tests.
pub fn jpeg_item(name: &str) -> RawItem {
    raw_item(name, "image/jpeg", 4)
}
