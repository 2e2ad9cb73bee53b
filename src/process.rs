//! Batch ingestion of cover scans.
//!
//! Takes an ordered batch of [`RawItem`]s and turns each one into an
//! [`ItemOutcome`]: either a normalized image pair plus filename metadata, or
//! a failure reason. Successful items are handed to a [`Catalog`] as
//! [`ComicRecord`]s.
//!
//! ## Per-item pipeline
//!
//! ```text
//! validate (declared type, declared size)
//!     → read bytes (files on disk are read only now)
//!     → normalize (decode once → preview + full)
//!     → extract metadata from the filename
//!     → catalog.add(record)
//! ```
//!
//! Any error along the way fails that item only; the batch always runs to
//! the end. The one batch-level failure is a batch with no `image/*` item at
//! all, reported as [`IngestError::NoValidFiles`] before any item is touched.
//!
//! ## Ordering and progress
//!
//! Items are processed strictly sequentially in input order. Progress goes
//! out over an optional channel as [`IngestEvent`]s:
//!
//! ```text
//! BatchStarted { total: 3 }
//! StatusChanged { 0, pending } … StatusChanged { 2, pending }
//! StatusChanged { 0, processing }
//! StatusChanged { 0, success }
//! Progress { completed: 1, total: 3 }
//! StatusChanged { 1, processing }
//! …
//! ```
//!
//! Outcomes are appended to a log indexed like the input, so
//! `report.outcomes[i]` always belongs to `items[i]`. Notifications are
//! fire-and-forget: a dropped receiver silences them without affecting the
//! batch.

use crate::catalog::Catalog;
use crate::config::{IngestConfig, LimitsConfig};
use crate::imaging::{BackendError, ImageBackend, NormalizedImagePair, RustBackend, normalize};
use crate::metadata::ExtractedMetadata;
use crate::naming::extract_metadata_on;
use crate::types::{BatchProgress, ComicRecord, ItemStatus, RawItem};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Batch-level failure: nothing in the batch was worth processing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("No valid image files found")]
    NoValidFiles,
}

/// Why a single item failed. The `Display` text is the user-facing reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("Invalid file type. Only {accepted} are supported.")]
    InvalidType {
        content_type: String,
        accepted: String,
    },
    #[error("File too large. Maximum size is {}.", format_size(.max))]
    TooLarge { size: u64, max: u64 },
    #[error("Failed to read file: {0}")]
    Read(String),
    #[error(transparent)]
    Imaging(#[from] BackendError),
}

/// Result of ingesting one item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Success {
        source_name: String,
        metadata: ExtractedMetadata,
        images: NormalizedImagePair,
    },
    Failure {
        source_name: String,
        error: ItemError,
    },
}

impl ItemOutcome {
    pub fn source_name(&self) -> &str {
        match self {
            ItemOutcome::Success { source_name, .. } | ItemOutcome::Failure { source_name, .. } => {
                source_name
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success { .. })
    }

    /// Terminal status this outcome corresponds to.
    pub fn status(&self) -> ItemStatus {
        if self.is_success() {
            ItemStatus::Success
        } else {
            ItemStatus::Error
        }
    }
}

/// A failed item as listed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub filename: String,
    pub error: String,
}

/// Progress notifications emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestEvent {
    BatchStarted {
        total: usize,
    },
    StatusChanged {
        index: usize,
        name: String,
        status: ItemStatus,
        /// Failure reason, present only with [`ItemStatus::Error`].
        error: Option<String>,
    },
    Progress(BatchProgress),
}

/// Everything a finished batch produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// One outcome per input item, in input order.
    pub outcomes: Vec<ItemOutcome>,
    /// Failed items only, in input order.
    pub failures: Vec<ItemFailure>,
    pub progress: BatchProgress,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }
}

/// Render a byte limit the way users read it: `5MB`, `512KB`, `1000 bytes`.
fn format_size(bytes: &u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    match *bytes {
        b if b >= MB && b % MB == 0 => format!("{}MB", b / MB),
        b if b >= KB && b % KB == 0 => format!("{}KB", b / KB),
        b => format!("{b} bytes"),
    }
}

/// Human label for a media type: `image/jpeg` → `JPG`, `image/webp` → `WebP`.
fn type_label(media_type: &str) -> String {
    match media_type {
        "image/jpeg" => "JPG".to_string(),
        "image/webp" => "WebP".to_string(),
        other => other
            .strip_prefix("image/")
            .unwrap_or(other)
            .to_uppercase(),
    }
}

/// `["a"]` → `a`, `["a","b"]` → `a and b`, `["a","b","c"]` → `a, b, and c`.
fn describe_types(types: &[String]) -> String {
    let labels: Vec<String> = types.iter().map(|t| type_label(t)).collect();
    match labels.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{a} and {b}"),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

/// Check an item's declared type and size before any decoding.
pub fn validate_item(item: &RawItem, limits: &LimitsConfig) -> Result<(), ItemError> {
    if !limits.accepted_types.iter().any(|t| *t == item.content_type) {
        return Err(ItemError::InvalidType {
            content_type: item.content_type.clone(),
            accepted: describe_types(&limits.accepted_types),
        });
    }
    if item.size > limits.max_file_size {
        return Err(ItemError::TooLarge {
            size: item.size,
            max: limits.max_file_size,
        });
    }
    Ok(())
}

/// Validate, normalize and extract one item.
fn process_item(
    backend: &impl ImageBackend,
    item: &RawItem,
    config: &IngestConfig,
    today: NaiveDate,
) -> Result<(ExtractedMetadata, NormalizedImagePair), ItemError> {
    validate_item(item, &config.limits)?;
    let bytes = item
        .read_bytes()
        .map_err(|e| ItemError::Read(e.to_string()))?;
    let images = normalize(
        backend,
        &bytes,
        &config.preview_config(),
        &config.full_config(),
    )?;
    let metadata = extract_metadata_on(&item.name, today);
    Ok((metadata, images))
}

fn emit(events: &Option<Sender<IngestEvent>>, event: IngestEvent) {
    if let Some(tx) = events {
        // A closed receiver only means nobody is watching any more.
        let _ = tx.send(event);
    }
}

/// Ingest a batch with the pure-Rust imaging backend.
pub fn ingest(
    items: &[RawItem],
    config: &IngestConfig,
    catalog: &mut impl Catalog,
    events: Option<Sender<IngestEvent>>,
) -> Result<BatchReport, IngestError> {
    ingest_with_backend(&RustBackend::new(), items, config, catalog, events)
}

/// Ingest a batch using a specific backend (allows testing with mock).
pub fn ingest_with_backend(
    backend: &impl ImageBackend,
    items: &[RawItem],
    config: &IngestConfig,
    catalog: &mut impl Catalog,
    events: Option<Sender<IngestEvent>>,
) -> Result<BatchReport, IngestError> {
    if !items.iter().any(RawItem::is_image) {
        emit(&events, IngestEvent::BatchStarted { total: 0 });
        tracing::warn!(submitted = items.len(), "no image files in batch");
        return Err(IngestError::NoValidFiles);
    }

    let total = items.len();
    let today = Utc::now().date_naive();
    let mut progress = BatchProgress {
        completed: 0,
        total,
    };
    let mut outcomes: Vec<ItemOutcome> = Vec::with_capacity(total);

    tracing::info!(total, "batch started");
    emit(&events, IngestEvent::BatchStarted { total });
    for (index, item) in items.iter().enumerate() {
        emit(
            &events,
            IngestEvent::StatusChanged {
                index,
                name: item.name.clone(),
                status: ItemStatus::Pending,
                error: None,
            },
        );
    }

    for (index, item) in items.iter().enumerate() {
        emit(
            &events,
            IngestEvent::StatusChanged {
                index,
                name: item.name.clone(),
                status: ItemStatus::Processing,
                error: None,
            },
        );

        let outcome = match process_item(backend, item, config, today) {
            Ok((metadata, images)) => {
                let record =
                    ComicRecord::from_ingest(&metadata, &images, &config.catalog.default_condition);
                let id = catalog.add(record);
                tracing::info!(file = %item.name, %id, series = %metadata.series, issue = metadata.issue_number, "item ingested");
                ItemOutcome::Success {
                    source_name: item.name.clone(),
                    metadata,
                    images,
                }
            }
            Err(error) => {
                tracing::warn!(file = %item.name, %error, "item failed");
                ItemOutcome::Failure {
                    source_name: item.name.clone(),
                    error,
                }
            }
        };

        let error = match &outcome {
            ItemOutcome::Failure { error, .. } => Some(error.to_string()),
            ItemOutcome::Success { .. } => None,
        };
        emit(
            &events,
            IngestEvent::StatusChanged {
                index,
                name: item.name.clone(),
                status: outcome.status(),
                error,
            },
        );
        outcomes.push(outcome);

        progress.completed += 1;
        emit(&events, IngestEvent::Progress(progress));
    }

    let failures: Vec<ItemFailure> = outcomes
        .iter()
        .filter_map(|o| match o {
            ItemOutcome::Failure { source_name, error } => Some(ItemFailure {
                filename: source_name.clone(),
                error: error.to_string(),
            }),
            ItemOutcome::Success { .. } => None,
        })
        .collect();

    tracing::info!(
        succeeded = total - failures.len(),
        failed = failures.len(),
        "batch finished"
    );

    Ok(BatchReport {
        outcomes,
        failures,
        progress,
    })
}
