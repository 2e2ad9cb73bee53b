//! Comic metadata produced by filename extraction.
//!
//! [`ExtractedMetadata`] is the structured result of
//! [`naming::extract_metadata`](crate::naming::extract_metadata). This module
//! holds the type plus the field normalizers applied after matching:
//!
//! - **Series**: title-cased word by word (`amazing SPIDER man` → `Amazing Spider Man`).
//! - **Publisher**: the first entry of [`KNOWN_PUBLISHERS`] found, case-insensitively,
//!   inside the *raw* series text. Matching happens before title-casing so a
//!   publisher name is recognised however the file was named.
//! - **Publication date**: `YYYY-01-01` when a year was captured, otherwise the
//!   supplied fallback day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Publishers recognised in series names, in match priority order.
pub const KNOWN_PUBLISHERS: &[&str] = &[
    "Marvel",
    "DC Comics",
    "Image Comics",
    "Dark Horse",
    "IDW",
    "Vertigo",
    "Boom! Studios",
];

pub const UNKNOWN_SERIES: &str = "Unknown Series";
pub const UNKNOWN_PUBLISHER: &str = "Unknown Publisher";

/// Structured metadata derived from a cover scan's filename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMetadata {
    pub series: String,
    pub title: String,
    pub issue_number: u32,
    pub cover_price: f64,
    /// ISO `YYYY-MM-DD`.
    pub publication_date: String,
    pub publisher: String,
}

/// Title-case a series name.
///
/// Splits on single spaces, so runs of spaces survive as-is inside the
/// name; only the ends are trimmed.
pub fn format_series(series: &str) -> String {
    series
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.as_str().to_lowercase().chars())
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Find the first known publisher mentioned in a raw series name.
pub fn detect_publisher(series: &str) -> &'static str {
    let upper = series.to_uppercase();
    KNOWN_PUBLISHERS
        .iter()
        .find(|publisher| upper.contains(&publisher.to_uppercase()))
        .copied()
        .unwrap_or(UNKNOWN_PUBLISHER)
}

/// Publication date from an optional captured year.
pub fn format_date(year: Option<&str>, fallback: NaiveDate) -> String {
    match year {
        Some(y) => format!("{y}-01-01"),
        None => fallback.format("%Y-%m-%d").to_string(),
    }
}
