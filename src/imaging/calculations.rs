//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Fractional results are rounded half away from zero and never drop below 1px.

fn scale_edge(edge: u32, ratio: f64) -> u32 {
    ((edge as f64 * ratio).round() as u32).max(1)
}

/// Calculate preview dimensions that fit the longer edge into `max_edge`.
///
/// Images whose longer edge is already within the cap are returned unchanged.
/// Otherwise the longer edge becomes exactly `max_edge` and the other edge is
/// scaled by the same factor.
///
/// # Examples
/// ```
/// # use coverbox::imaging::calculate_preview_dimensions;
/// // 1000x1500 portrait cover → 133x200
/// assert_eq!(calculate_preview_dimensions((1000, 1500), 200), (133, 200));
///
/// // Already small enough
/// assert_eq!(calculate_preview_dimensions((120, 180), 200), (120, 180));
/// ```
pub fn calculate_preview_dimensions(source: (u32, u32), max_edge: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let longer_edge = src_w.max(src_h);

    if longer_edge <= max_edge {
        return source;
    }

    let ratio = max_edge as f64 / longer_edge as f64;
    if src_w >= src_h {
        // Landscape or square
        (max_edge, scale_edge(src_h, ratio).min(max_edge))
    } else {
        // Portrait
        (scale_edge(src_w, ratio).min(max_edge), max_edge)
    }
}

/// Calculate full-size dimensions bounded by a width cap and a height cap.
///
/// Both caps are honoured at once: the single most restrictive ratio is
/// applied to both edges, so the result never exceeds either cap and the
/// aspect ratio is preserved. The binding edge lands exactly on its cap.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `max` - Caps as (max_width, max_height)
pub fn calculate_full_dimensions(source: (u32, u32), max: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = max;

    let width_ratio = max_w as f64 / src_w as f64;
    let height_ratio = max_h as f64 / src_h as f64;

    if width_ratio >= 1.0 && height_ratio >= 1.0 {
        return source;
    }

    if width_ratio <= height_ratio {
        (max_w, scale_edge(src_h, width_ratio).min(max_h))
    } else {
        (scale_edge(src_w, height_ratio).min(max_w), max_h)
    }
}
