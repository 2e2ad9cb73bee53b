//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, EncodedImage, ImageBackend};
use super::calculations::{calculate_full_dimensions, calculate_preview_dimensions};
use super::params::{Quality, ResampleParams};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Configuration for the preview variant (thumbnail shown in grids).
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Cap on the longer edge.
    pub max_edge: u32,
    pub quality: Quality,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_edge: 200,
            quality: Quality::new(70),
        }
    }
}

/// Configuration for the full-size variant.
#[derive(Debug, Clone)]
pub struct FullConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
}

impl Default for FullConfig {
    fn default() -> Self {
        Self {
            max_width: 1200,
            max_height: 1800,
            quality: Quality::new(85),
        }
    }
}

/// One normalized variant: a data URL plus the pixel size it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

impl From<EncodedImage> for NormalizedImage {
    fn from(encoded: EncodedImage) -> Self {
        Self {
            data_url: to_data_url(encoded.media_type, &encoded.bytes),
            width: encoded.width,
            height: encoded.height,
        }
    }
}

/// Preview and full variants of one source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImagePair {
    pub preview: NormalizedImage,
    pub full: NormalizedImage,
    /// Dimensions of the decoded source.
    pub source: Dimensions,
}

/// Wrap encoded bytes as a `data:` URL.
pub fn to_data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Plan both resample operations for a source of the given size.
///
/// Useful for testing parameter generation.
pub fn plan_variants(
    source: Dimensions,
    preview: &PreviewConfig,
    full: &FullConfig,
) -> (ResampleParams, ResampleParams) {
    let (preview_w, preview_h) = calculate_preview_dimensions(source.into(), preview.max_edge);
    let (full_w, full_h) =
        calculate_full_dimensions(source.into(), (full.max_width, full.max_height));

    (
        ResampleParams {
            width: preview_w,
            height: preview_h,
            quality: preview.quality,
        },
        ResampleParams {
            width: full_w,
            height: full_h,
            quality: full.quality,
        },
    )
}

/// Decode `bytes` once and produce the preview and full variants from the
/// same decoded pixels.
pub fn normalize(
    backend: &impl ImageBackend,
    bytes: &[u8],
    preview: &PreviewConfig,
    full: &FullConfig,
) -> Result<NormalizedImagePair> {
    let image = backend.decode(bytes)?;
    let source = backend.dimensions(&image);
    let (preview_params, full_params) = plan_variants(source, preview, full);

    tracing::debug!(
        source = %format!("{}x{}", source.width, source.height),
        preview = %format!("{}x{}", preview_params.width, preview_params.height),
        full = %format!("{}x{}", full_params.width, full_params.height),
        "resampling"
    );

    let preview = backend.resample(&image, &preview_params)?;
    let full = backend.resample(&image, &full_params)?;

    Ok(NormalizedImagePair {
        preview: preview.into(),
        full: full.into(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    #[test]
    fn data_url_wraps_base64() {
        assert_eq!(
            to_data_url("image/jpeg", b"abc"),
            "data:image/jpeg;base64,YWJj"
        );
    }

    #[test]
    fn default_configs() {
        let preview = PreviewConfig::default();
        assert_eq!(preview.max_edge, 200);
        assert_eq!(preview.quality.value(), 70);

        let full = FullConfig::default();
        assert_eq!((full.max_width, full.max_height), (1200, 1800));
        assert_eq!(full.quality.value(), 85);
    }

    #[test]
    fn plan_variants_for_large_cover() {
        let (preview, full) = plan_variants(
            Dimensions {
                width: 2000,
                height: 3000,
            },
            &PreviewConfig::default(),
            &FullConfig::default(),
        );
        assert_eq!((preview.width, preview.height), (133, 200));
        assert_eq!(preview.quality.value(), 70);
        assert_eq!((full.width, full.height), (1200, 1800));
        assert_eq!(full.quality.value(), 85);
    }

    #[test]
    fn plan_variants_for_small_image_keeps_full_size() {
        let (preview, full) = plan_variants(
            Dimensions {
                width: 150,
                height: 100,
            },
            &PreviewConfig::default(),
            &FullConfig::default(),
        );
        assert_eq!((preview.width, preview.height), (150, 100));
        assert_eq!((full.width, full.height), (150, 100));
    }

    #[test]
    fn normalize_decodes_once_resamples_twice() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 1000,
            height: 1500,
        }]);

        let pair = normalize(
            &backend,
            b"cover bytes",
            &PreviewConfig::default(),
            &FullConfig::default(),
        )
        .unwrap();

        assert_eq!(
            backend.get_operations(),
            vec![
                RecordedOp::Decode { len: 11 },
                RecordedOp::Resample {
                    width: 133,
                    height: 200,
                    quality: 70
                },
                RecordedOp::Resample {
                    width: 1000,
                    height: 1500,
                    quality: 85
                },
            ]
        );
        assert_eq!((pair.preview.width, pair.preview.height), (133, 200));
        assert_eq!((pair.full.width, pair.full.height), (1000, 1500));
        assert!(pair.preview.data_url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(pair.source.width, 1000);
    }

    #[test]
    fn normalize_decode_failure_skips_resampling() {
        let backend = MockBackend::new();
        let result = normalize(
            &backend,
            b"junk",
            &PreviewConfig::default(),
            &FullConfig::default(),
        );
        assert!(matches!(result, Err(BackendError::Decode(_))));
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn normalize_honours_custom_caps() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 800,
            height: 400,
        }]);
        let preview = PreviewConfig {
            max_edge: 100,
            quality: Quality::new(50),
        };
        let full = FullConfig {
            max_width: 400,
            max_height: 400,
            quality: Quality::new(90),
        };
        let pair = normalize(&backend, b"x", &preview, &full).unwrap();
        assert_eq!((pair.preview.width, pair.preview.height), (100, 50));
        assert_eq!((pair.full.width, pair.full.height), (400, 200));
    }
}
