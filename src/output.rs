//! CLI output formatting.
//!
//! Every entity leads with its identity (positional index + source filename
//! for batch items, series + issue for extracted metadata) and shows details
//! as indented context lines.
//!
//! # Output Format
//!
//! ## Ingest progress
//!
//! ```text
//! Ingesting 3 files
//! 001 Amazing-Spider-Man_129_(1973)_$0.20.jpg
//!     success (1/3)
//! 002 notes.txt
//!     error: Invalid file type. Only JPG, PNG, and WebP are supported.
//!     (2/3)
//! ```
//!
//! ## Batch summary
//!
//! ```text
//! Added
//! 001 Amazing Spider Man #129
//!     Publisher: Unknown Publisher
//!     Date: 1973-01-01
//!     Price: $0.20
//!     Cover: 1200x1800 (preview 133x200)
//!
//! Failed
//!     notes.txt: Invalid file type. Only JPG, PNG, and WebP are supported.
//!
//! Ingested 2 of 3 files
//! ```
//!
//! ## Catalog listing
//!
//! ```text
//! Image Comics (2 comics)
//!     001 Saga #1
//!         Id: 5b0e…
//!         Date: 2012-03-14
//!         Condition: Near Mint
//!     002 Saga #2
//!         …
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::catalog::RecordGroup;
use crate::metadata::ExtractedMetadata;
use crate::process::{BatchReport, IngestEvent, ItemOutcome};
use crate::types::{ComicRecord, ItemStatus};

/// Format a 0-based batch index as a 1-based, 3-digit zero-padded position.
fn format_index(index: usize) -> String {
    format!("{:0>3}", index + 1)
}

fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

/// `Amazing Spider Man #129`, with ` - Title` when there is one.
fn heading(series: &str, issue: u32, title: &str) -> String {
    if title.is_empty() {
        format!("{series} #{issue}")
    } else {
        format!("{series} #{issue} - {title}")
    }
}

fn comic_heading(metadata: &ExtractedMetadata) -> String {
    heading(&metadata.series, metadata.issue_number, &metadata.title)
}

fn record_heading(record: &ComicRecord) -> String {
    heading(&record.series, record.issue_number, &record.title)
}

fn metadata_context(metadata: &ExtractedMetadata, indent: &str) -> Vec<String> {
    vec![
        format!("{indent}Publisher: {}", metadata.publisher),
        format!("{indent}Date: {}", metadata.publication_date),
        format!("{indent}Price: {}", format_price(metadata.cover_price)),
    ]
}

// ============================================================================
// Ingest progress
// ============================================================================

/// Format a single ingest event as display lines.
///
/// Pending notifications produce no output; every item announces itself when
/// it starts processing instead.
pub fn format_ingest_event(event: &IngestEvent) -> Vec<String> {
    match event {
        IngestEvent::BatchStarted { total: 0 } => vec!["No image files to ingest".to_string()],
        IngestEvent::BatchStarted { total } => {
            let noun = if *total == 1 { "file" } else { "files" };
            vec![format!("Ingesting {total} {noun}")]
        }
        IngestEvent::StatusChanged {
            index,
            name,
            status,
            error,
        } => match status {
            ItemStatus::Pending => Vec::new(),
            ItemStatus::Processing => vec![format!("{} {}", format_index(*index), name)],
            ItemStatus::Success => vec!["    success".to_string()],
            ItemStatus::Error => vec![format!(
                "    error: {}",
                error.as_deref().unwrap_or("unknown error")
            )],
        },
        IngestEvent::Progress(progress) => {
            vec![format!("    ({}/{})", progress.completed, progress.total)]
        }
    }
}

// ============================================================================
// Batch summary
// ============================================================================

/// Format the end-of-batch summary: added comics, failures, totals.
pub fn format_batch_summary(report: &BatchReport) -> Vec<String> {
    let mut lines = Vec::new();

    let added: Vec<(usize, &ItemOutcome)> = report
        .outcomes
        .iter()
        .enumerate()
        .filter(|(_, o)| o.is_success())
        .collect();

    if !added.is_empty() {
        lines.push("Added".to_string());
        for (index, outcome) in added {
            if let ItemOutcome::Success {
                metadata, images, ..
            } = outcome
            {
                lines.push(format!("{} {}", format_index(index), comic_heading(metadata)));
                lines.extend(metadata_context(metadata, "    "));
                lines.push(format!(
                    "    Cover: {}x{} (preview {}x{})",
                    images.full.width, images.full.height, images.preview.width, images.preview.height
                ));
            }
        }
        lines.push(String::new());
    }

    if !report.failures.is_empty() {
        lines.push("Failed".to_string());
        for failure in &report.failures {
            lines.push(format!("    {}: {}", failure.filename, failure.error));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Ingested {} of {} files",
        report.succeeded(),
        report.progress.total
    ));
    lines
}

/// Print the batch summary to stdout.
pub fn print_batch_summary(report: &BatchReport) {
    for line in format_batch_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Extract
// ============================================================================

/// Format metadata extracted from one filename.
pub fn format_extracted(filename: &str, metadata: &ExtractedMetadata) -> Vec<String> {
    let mut lines = vec![filename.to_string()];
    lines.push(format!("    {}", comic_heading(metadata)));
    lines.extend(metadata_context(metadata, "        "));
    lines
}

/// Print extracted metadata to stdout.
pub fn print_extracted(filename: &str, metadata: &ExtractedMetadata) {
    for line in format_extracted(filename, metadata) {
        println!("{}", line);
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Format grouped catalog records, each group headed by its title and size.
pub fn format_catalog_list(groups: &[RecordGroup<'_>]) -> Vec<String> {
    if groups.is_empty() {
        return vec!["Catalog is empty".to_string()];
    }
    let mut lines = Vec::new();
    for group in groups {
        let noun = if group.records.len() == 1 {
            "comic"
        } else {
            "comics"
        };
        lines.push(format!("{} ({} {})", group.title, group.records.len(), noun));
        for (index, record) in group.records.iter().enumerate() {
            lines.push(format!("    {} {}", format_index(index), record_heading(record)));
            lines.push(format!("        Id: {}", record.id));
            lines.push(format!("        Date: {}", record.publication_date));
            lines.push(format!("        Condition: {}", record.condition));
            if !record.custom_tags.is_empty() {
                lines.push(format!("        Tags: {}", record.custom_tags.join(", ")));
            }
        }
    }
    lines
}

/// Print grouped catalog records to stdout.
pub fn print_catalog_list(groups: &[RecordGroup<'_>]) {
    for line in format_catalog_list(groups) {
        println!("{}", line);
    }
}

/// One-line identity of a record after a change: `Removed Saga #1 (id)`.
pub fn format_record_change(verb: &str, record: &ComicRecord) -> String {
    format!("{verb} {} ({})", record_heading(record), record.id)
}
