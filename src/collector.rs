//! Candidate collection.
//!
//! Walks the root directory and returns every regular file that should be
//! sorted. In recursive mode, directories named exactly like a category folder
//! are never entered, so files that were sorted by an earlier run are left
//! alone. Enumeration errors are gathered next to the files instead of aborting
//! the walk.

use crate::error::OrganizeError;
use crate::file_category::Category;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// The outcome of one collection pass.
#[derive(Debug, Default)]
pub struct Collection {
    /// Candidate files in enumeration order.
    pub files: Vec<PathBuf>,
    /// Directories that could not be enumerated. Always `OrganizeError::Scan`.
    pub errors: Vec<OrganizeError>,
}

impl Collection {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Collects candidate files under `root`.
///
/// Non-recursive mode lists the immediate children of `root` that are regular
/// files (symlinks to files included, symlinks to directories excluded).
/// Recursive mode walks every subdirectory except those named like a category,
/// and also drops any file whose parent directory carries a category name.
///
/// The order is whatever the filesystem returns and is not sorted.
pub fn collect(root: &Path, recursive: bool) -> Collection {
    let collection = if recursive {
        collect_recursive(root)
    } else {
        collect_flat(root)
    };

    log::debug!(
        "collected {} candidate(s) under {} ({} scan error(s))",
        collection.files.len(),
        root.display(),
        collection.errors.len()
    );
    collection
}

fn collect_flat(root: &Path) -> Collection {
    let mut collection = Collection::default();

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            collection.errors.push(OrganizeError::Scan {
                path: root.to_path_buf(),
                source: e,
            });
            return collection;
        }
    };

    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                // `Path::is_file` follows symlinks, which is what we want here.
                if path.is_file() {
                    collection.files.push(path);
                }
            }
            Err(e) => collection.errors.push(OrganizeError::Scan {
                path: root.to_path_buf(),
                source: e,
            }),
        }
    }

    collection
}

fn collect_recursive(root: &Path) -> Collection {
    let mut collection = Collection::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_category_folder(entry));

    for entry in walker {
        match entry {
            Ok(entry) => {
                if is_candidate(&entry) && !in_category_folder(entry.path()) {
                    collection.files.push(entry.into_path());
                }
            }
            Err(e) => collection.errors.push(OrganizeError::from(e)),
        }
    }

    collection
}

// The root itself is never pruned, even if it carries a category name.
fn is_category_folder(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && Category::is_category_dir(&entry.file_name().to_string_lossy())
}

fn is_candidate(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

fn in_category_folder(path: &Path) -> bool {
    path.parent()
        .and_then(Path::file_name)
        .is_some_and(|name| Category::is_category_dir(&name.to_string_lossy()))
}
