//! # Coverbox
//!
//! Bulk ingestion of comic book cover scans into a personal catalog.
//! Filenames are the data source: `Amazing-Spider-Man_129_(1973)_$0.20.jpg`
//! becomes series, issue, year and cover price, and the scan itself becomes a
//! small preview plus a bounded full-size cover, both stored inline as data
//! URLs.
//!
//! # Architecture: One Batch, Three Steps Per Item
//!
//! ```text
//! RawItem ──► validate ──► normalize ──► extract metadata ──► Catalog::add
//!             (type,size)  (preview+full)  (from filename)
//! ```
//!
//! A batch is processed strictly in input order, one item at a time. A bad
//! item fails alone; the rest of the batch carries on. Progress is reported
//! over an optional channel so the CLI can print while work continues.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`process`] | Batch orchestration: validation, per-item outcomes, progress events |
//! | [`naming`] | Filename parser: series, issue, title, year, price |
//! | [`metadata`] | Metadata record, series formatting, publisher detection, date fallback |
//! | [`imaging`] | Decode once, resample to preview and full size, encode as data URLs |
//! | [`scan`] | Command-line paths to `RawItem`s, described without being read |
//! | [`catalog`] | The `Catalog` seam, the JSON-file catalog (edit, remove, import/export) and grouping |
//! | [`config`] | `coverbox.toml` loading, stock defaults, merging, validation |
//! | [`types`] | Shared types: `RawItem`, `ItemStatus`, `ComicRecord` |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Decode Once
//!
//! Each upload is decoded a single time and both variants are resampled from
//! the same pixels. Sizes are computed by pure functions in [`imaging`], so
//! the geometry is testable without touching an encoder.
//!
//! ## JPEG Data URLs
//!
//! Both variants are re-encoded as JPEG regardless of the input format and
//! stored as `data:image/jpeg;base64,…`. A catalog is then one
//! self-contained JSON file; there is no image directory to keep in sync.
//! Transparency is flattened in the process, which suits scanned covers.
//!
//! ## Filenames Over Sidecars
//!
//! Everything the catalog knows about a new cover comes from its filename.
//! Names without an issue number still ingest, filed under "Unknown Series"
//! with defaults everywhere else, so nothing a user drops in is silently lost.

pub mod catalog;
pub mod config;
pub mod imaging;
pub mod logging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
