//! Filename parsing for comic cover scans.
//!
//! Scans are usually named after the issue they show, with underscores or
//! dashes standing in for spaces:
//!
//! ```text
//! Amazing-Spider-Man_129_(1973)_$0.20.jpg
//! └──── series ────┘ └┬┘ └─year─┘ └price┘
//!                   issue
//! ```
//!
//! The general shape is `<series> <issue> [title] [(YYYY)] [$price]`, where the
//! issue may also be written `#<issue>`.
//!
//! ## Matching
//!
//! Extraction runs as a chain of small matchers, each testable on its own:
//!
//! 1. [`strip_extension`] and separator normalization (`_`/`-` → space)
//! 2. [`split_issue`]: the first whole number preceded by whitespace or `#`
//!    and followed by whitespace or the end. Everything before it is the series.
//! 3. [`take_price`]: a trailing `$N` or `$N.NN`
//! 4. [`take_year`]: a trailing `(YYYY)`
//! 5. whatever is left between the issue and the year/price is the title
//!
//! If step 2 finds no issue the whole name is treated as unrecognised and
//! every field falls back to its default. Extraction never fails.
//!
//! Names with several numbers are ambiguous: `Spider Man 2099 1` yields issue
//! 2099 and title `1`. The first qualifying number always wins.

use crate::metadata::{
    ExtractedMetadata, UNKNOWN_SERIES, detect_publisher, format_date, format_series,
};
use chrono::{NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

static ISSUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s+|#)([0-9]+)(?:\s|$)").expect("issue pattern"));

static TRAILING_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+\$([0-9]+\.[0-9]{2}|[0-9]+)$").expect("price pattern")
});

static TRAILING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\(([0-9]{4})\)$").expect("year pattern"));

/// Series, issue and the unparsed remainder of a cleaned filename.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueSplit<'a> {
    /// Raw series text, possibly with trailing whitespace. Empty when the
    /// name starts with `#N`.
    pub series: &'a str,
    pub issue: &'a str,
    /// Text after the issue number; empty or starting with whitespace.
    pub rest: &'a str,
}

/// Strip a trailing `.ext` from a filename.
///
/// Only the last dot counts, and an "extension" containing `/` is not one.
/// `archive.tar.gz` → `archive.tar`, `Batman 12` → `Batman 12`.
pub fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => filename,
    }
}

/// Strip the extension and turn `_` and `-` into spaces.
pub fn clean_filename(filename: &str) -> String {
    strip_extension(filename).replace(['_', '-'], " ")
}

/// Locate the issue number in a cleaned filename.
pub fn split_issue(clean: &str) -> Option<IssueSplit<'_>> {
    let caps = ISSUE.captures(clean)?;
    let whole = caps.get(0)?;
    let issue = caps.get(1)?;
    Some(IssueSplit {
        series: &clean[..whole.start()],
        issue: issue.as_str(),
        rest: &clean[issue.end()..],
    })
}

/// Peel a trailing `$price` off `rest`.
pub fn take_price(rest: &str) -> (&str, Option<&str>) {
    take_trailing(&TRAILING_PRICE, rest)
}

/// Peel a trailing `(YYYY)` off `rest`.
pub fn take_year(rest: &str) -> (&str, Option<&str>) {
    take_trailing(&TRAILING_YEAR, rest)
}

fn take_trailing<'a>(pattern: &Regex, rest: &'a str) -> (&'a str, Option<&'a str>) {
    match pattern.captures(rest) {
        Some(caps) => match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(value)) => (&rest[..whole.start()], Some(value.as_str())),
            _ => (rest, None),
        },
        None => (rest, None),
    }
}

/// Extract metadata from a filename, dating unrecognised names today (UTC).
pub fn extract_metadata(filename: &str) -> ExtractedMetadata {
    extract_metadata_on(filename, Utc::now().date_naive())
}

/// Extract metadata from a filename with an explicit fallback date.
///
/// Deterministic: the same `(filename, today)` always gives the same result.
pub fn extract_metadata_on(filename: &str, today: NaiveDate) -> ExtractedMetadata {
    let clean = clean_filename(filename);

    let Some(split) = split_issue(&clean) else {
        return ExtractedMetadata {
            series: UNKNOWN_SERIES.to_string(),
            title: String::new(),
            issue_number: 0,
            cover_price: 0.0,
            publication_date: format_date(None, today),
            publisher: detect_publisher("").to_string(),
        };
    };

    let (rest, price) = take_price(split.rest);
    let (rest, year) = take_year(rest);
    let title = rest.trim_start();

    let series = if split.series.is_empty() {
        UNKNOWN_SERIES
    } else {
        split.series
    };

    ExtractedMetadata {
        series: format_series(series),
        title: title.to_string(),
        issue_number: split.issue.parse().unwrap_or(0),
        cover_price: price.and_then(|p| p.parse().ok()).unwrap_or(0.0),
        publication_date: format_date(year, today),
        publisher: detect_publisher(split.series).to_string(),
    }
}
