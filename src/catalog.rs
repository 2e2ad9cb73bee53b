//! Catalog storage for ingested records.
//!
//! Ingestion only needs one thing from storage: somewhere to put a finished
//! [`ComicRecord`]. That seam is the [`Catalog`] trait. The catalog, not the
//! ingestion stage, assigns record ids.
//!
//! [`JsonCatalog`] is the file-backed implementation used by the CLI. The
//! whole collection lives in one pretty-printed JSON array (`comics.json` by
//! default), the same shape a browser export produces, so files move freely
//! between the two via `export` / `import`.
//!
//! Browsing is done with [`group_records`], which buckets records by series,
//! publisher or publication year, sorts bucket titles alphabetically and
//! orders each bucket by issue number.

use crate::types::ComicRecord;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid import file: {0}")]
    InvalidImport(String),
    #[error("No comic with id {0}")]
    NotFound(String),
}

/// Destination for successfully ingested records.
pub trait Catalog {
    /// Store `record` and return the id it was given.
    fn add(&mut self, record: ComicRecord) -> String;
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn assign_id(mut record: ComicRecord) -> ComicRecord {
    if record.id.is_empty() {
        record.id = new_id();
    }
    record
}

/// In-memory catalog, handy for callers that persist records themselves.
impl Catalog for Vec<ComicRecord> {
    fn add(&mut self, record: ComicRecord) -> String {
        let record = assign_id(record);
        let id = record.id.clone();
        self.push(record);
        id
    }
}

/// Field changes for an existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordEdit {
    pub condition: Option<String>,
    pub notes: Option<String>,
    /// Tags to add; ones already present are left alone.
    pub add_tags: Vec<String>,
}

impl RecordEdit {
    pub fn is_empty(&self) -> bool {
        self.condition.is_none() && self.notes.is_none() && self.add_tags.is_empty()
    }

    pub fn apply(&self, record: &mut ComicRecord) {
        if let Some(condition) = &self.condition {
            record.condition = condition.clone();
        }
        if let Some(notes) = &self.notes {
            record.notes = (!notes.is_empty()).then(|| notes.clone());
        }
        for tag in &self.add_tags {
            if !record.custom_tags.contains(tag) {
                record.custom_tags.push(tag.clone());
            }
        }
    }
}

/// A catalog persisted as a single JSON file.
#[derive(Debug)]
pub struct JsonCatalog {
    path: PathBuf,
    records: Vec<ComicRecord>,
}

impl JsonCatalog {
    /// Open the catalog at `path`. A missing file is an empty catalog.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let records = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[ComicRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ComicRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Replace the stored record that has the same id.
    pub fn update(&mut self, record: ComicRecord) -> Result<(), CatalogError> {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(CatalogError::NotFound(record.id)),
        }
    }

    /// Apply `edit` to the record with `id` and return the updated record.
    pub fn edit(&mut self, id: &str, edit: &RecordEdit) -> Result<&ComicRecord, CatalogError> {
        let mut record = self
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        edit.apply(&mut record);
        self.update(record)?;
        self.get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Delete a record, returning it.
    pub fn remove(&mut self, id: &str) -> Result<ComicRecord, CatalogError> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        Ok(self.records.remove(pos))
    }

    /// Write all records back to the catalog file.
    pub fn save(&self) -> Result<(), CatalogError> {
        self.write_to(&self.path)?;
        tracing::debug!(path = %self.path.display(), records = self.records.len(), "catalog saved");
        Ok(())
    }

    /// Write all records to an arbitrary path.
    pub fn export(&self, path: &Path) -> Result<(), CatalogError> {
        self.write_to(path)
    }

    /// Replace every record with the contents of an exported file.
    ///
    /// Imported records without an id receive one. The catalog is left
    /// untouched when the file does not parse. Returns the record count.
    pub fn import(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let content = fs::read_to_string(path)?;
        let imported: Vec<ComicRecord> = serde_json::from_str(&content)
            .map_err(|e| CatalogError::InvalidImport(e.to_string()))?;
        self.records = imported.into_iter().map(assign_id).collect();
        Ok(self.records.len())
    }

    fn write_to(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.records)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl Catalog for JsonCatalog {
    fn add(&mut self, record: ComicRecord) -> String {
        self.records.add(record)
    }
}

// =============================================================================
// Grouping
// =============================================================================

/// How [`group_records`] buckets a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupBy {
    #[default]
    Series,
    Publisher,
    Year,
    None,
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "series" => Ok(GroupBy::Series),
            "publisher" => Ok(GroupBy::Publisher),
            "year" => Ok(GroupBy::Year),
            "none" => Ok(GroupBy::None),
            other => Err(format!(
                "unknown grouping '{other}' (expected series, publisher, year or none)"
            )),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroupBy::Series => "series",
            GroupBy::Publisher => "publisher",
            GroupBy::Year => "year",
            GroupBy::None => "none",
        })
    }
}

/// One bucket of records under a shared title.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordGroup<'a> {
    pub title: String,
    pub records: Vec<&'a ComicRecord>,
}

const ALL_COMICS: &str = "All Comics";
const UNKNOWN_YEAR: &str = "Unknown Year";

fn group_key(record: &ComicRecord, by: GroupBy) -> String {
    match by {
        GroupBy::Series => record.series.clone(),
        GroupBy::Publisher => record.publisher.clone(),
        GroupBy::Year => NaiveDate::parse_from_str(&record.publication_date, "%Y-%m-%d")
            .map(|d| d.year().to_string())
            .unwrap_or_else(|_| UNKNOWN_YEAR.to_string()),
        GroupBy::None => ALL_COMICS.to_string(),
    }
}

/// Bucket `records`, titles in ascending order, each bucket by issue number.
pub fn group_records(records: &[ComicRecord], by: GroupBy) -> Vec<RecordGroup<'_>> {
    let mut groups: BTreeMap<String, Vec<&ComicRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(group_key(record, by)).or_default().push(record);
    }
    groups
        .into_iter()
        .map(|(title, mut records)| {
            records.sort_by_key(|r| r.issue_number);
            RecordGroup { title, records }
        })
        .collect()
}
