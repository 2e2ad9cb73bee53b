//! Image normalization in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, WebP) |
//! | **Preview** | Lanczos3 to a 200px longer edge → JPEG q70 |
//! | **Full** | Lanczos3 within 1200×1800 → JPEG q85 |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, EncodedImage, ImageBackend};
pub use calculations::{calculate_full_dimensions, calculate_preview_dimensions};
pub use operations::{
    FullConfig, NormalizedImage, NormalizedImagePair, PreviewConfig, normalize, plan_variants,
    to_data_url,
};
pub use params::{Quality, ResampleParams};
pub use rust_backend::{RustBackend, media_type_for_path};
