//! Shared types passed between ingestion, catalog and output.
//!
//! [`ComicRecord`] is also the on-disk format of the catalog, so its serde
//! layout (camelCase keys) must stay stable across versions.

use crate::imaging::{NormalizedImagePair, media_type_for_path};
use crate::metadata::ExtractedMetadata;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where an item's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemBytes {
    /// Already in memory.
    Loaded(Vec<u8>),
    /// Read from disk only when the item passes validation.
    Deferred(PathBuf),
}

/// An unprocessed uploaded file plus its declared metadata.
///
/// `content_type` and `size` are what the picker *declared*; validation
/// trusts them and does not sniff `bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub bytes: ItemBytes,
}

impl RawItem {
    /// Build an in-memory item whose declared size is the byte length.
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size: bytes.len() as u64,
            bytes: ItemBytes::Loaded(bytes),
        }
    }

    /// Describe a file on disk without reading it.
    ///
    /// The type is declared from the extension and the size from file
    /// metadata. A file whose metadata cannot be read declares size 0 and
    /// fails later, when its bytes are read.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        Self {
            name,
            content_type: media_type_for_path(path).to_string(),
            size,
            bytes: ItemBytes::Deferred(path.to_path_buf()),
        }
    }

    /// Whether the declared type is in the `image/*` family at all.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// The item's bytes, reading deferred items from disk.
    pub fn read_bytes(&self) -> io::Result<Cow<'_, [u8]>> {
        match &self.bytes {
            ItemBytes::Loaded(bytes) => Ok(Cow::Borrowed(bytes)),
            ItemBytes::Deferred(path) => fs::read(path).map(Cow::Owned),
        }
    }
}

/// Observable lifecycle of one item within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Processing,
    Success,
    Error,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Processing => "processing",
            ItemStatus::Success => "success",
            ItemStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Items finished so far out of the batch total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

/// Creator credits. Ingestion leaves these empty for later editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creators {
    #[serde(default)]
    pub writers: Vec<String>,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub cover_artists: Vec<String>,
}

/// A catalog entry, as handed to [`Catalog::add`](crate::catalog::Catalog::add)
/// and as stored in `comics.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicRecord {
    /// Assigned by the catalog; empty until then.
    #[serde(default)]
    pub id: String,
    pub series: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    pub issue_number: u32,
    pub publication_date: String,
    pub publisher: String,
    #[serde(default)]
    pub creators: Creators,
    #[serde(default)]
    pub cover_price: f64,
    pub condition: String,
    /// Full-size image as a data URL.
    pub cover_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_tags: Vec<String>,
}

impl ComicRecord {
    /// Assemble a fresh record from a successful ingestion.
    pub fn from_ingest(
        metadata: &ExtractedMetadata,
        images: &NormalizedImagePair,
        condition: &str,
    ) -> Self {
        Self {
            id: String::new(),
            series: metadata.series.clone(),
            title: metadata.title.clone(),
            issue_number: metadata.issue_number,
            publication_date: metadata.publication_date.clone(),
            publisher: metadata.publisher.clone(),
            creators: Creators::default(),
            cover_price: metadata.cover_price,
            condition: condition.to_string(),
            cover_image: images.full.data_url.clone(),
            preview_image: Some(images.preview.data_url.clone()),
            notes: None,
            custom_tags: Vec::new(),
        }
    }
}
