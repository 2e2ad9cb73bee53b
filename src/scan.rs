//! Turn command-line paths into a batch of [`RawItem`]s.
//!
//! Files are described, not read: each item declares its type from the
//! extension and its size from file metadata, and carries its path so the
//! orchestrator reads the bytes only after validation passes. Directories
//! are walked recursively in file-name order. Hidden entries (leading `.`)
//! are skipped, as are their contents.
//!
//! Nothing here fails the batch. An explicit path that does not exist still
//! becomes an item, which then fails on its own when read. Walk errors
//! inside a directory are logged and skipped.

use crate::types::RawItem;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    // The walk root is never hidden, so `coverbox ingest .` works.
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Expand `paths` into items, in argument order, directories in name order.
pub fn collect_items(paths: &[PathBuf]) -> Vec<RawItem> {
    let mut items = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_dir(path, &mut items);
        } else {
            items.push(RawItem::from_path(path));
        }
    }
    items
}

fn collect_dir(root: &Path, items: &mut Vec<RawItem>) {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                items.push(RawItem::from_path(entry.path()));
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(root = %root.display(), %error, "skipping unreadable entry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemBytes;
    use std::fs;
    use tempfile::TempDir;

    fn names(items: &[RawItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn walks_directories_in_name_order() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("b-box")).unwrap();
        fs::write(tmp.path().join("b-box/Saga_2.jpg"), b"x").unwrap();
        fs::write(tmp.path().join("Saga_1.jpg"), b"x").unwrap();
        fs::write(tmp.path().join("a-notes.txt"), b"notes").unwrap();

        let items = collect_items(&[tmp.path().to_path_buf()]);
        assert_eq!(names(&items), vec!["Saga_1.jpg", "a-notes.txt", "Saga_2.jpg"]);
        assert_eq!(items[1].content_type, "application/octet-stream");
        assert_eq!(items[1].size, 5);
    }

    #[test]
    fn skips_hidden_entries() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".thumbs")).unwrap();
        fs::write(tmp.path().join(".thumbs/Saga_1.jpg"), b"x").unwrap();
        fs::write(tmp.path().join(".DS_Store"), b"x").unwrap();
        fs::write(tmp.path().join("Saga_1.jpg"), b"x").unwrap();

        let items = collect_items(&[tmp.path().to_path_buf()]);
        assert_eq!(names(&items), vec!["Saga_1.jpg"]);
    }

    #[test]
    fn explicit_files_keep_argument_order() {
        let tmp = TempDir::new().unwrap();
        let b = tmp.path().join("B_1.png");
        let a = tmp.path().join("A_1.webp");
        fs::write(&b, b"x").unwrap();
        fs::write(&a, b"x").unwrap();

        let items = collect_items(&[b, a]);
        assert_eq!(names(&items), vec!["B_1.png", "A_1.webp"]);
        assert_eq!(items[0].content_type, "image/png");
        assert_eq!(items[1].content_type, "image/webp");
    }

    #[test]
    fn missing_path_still_becomes_an_item() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("Gone_1.jpg");

        let items = collect_items(&[missing.clone()]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].bytes, ItemBytes::Deferred(missing));
        assert!(items[0].read_bytes().is_err());
    }
}
