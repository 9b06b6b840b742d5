//! Collision-free destination names.
//!
//! When a file with the same name already sits in the category folder, the
//! incoming file gets a numeric suffix: `report.txt` becomes `report_1.txt`,
//! then `report_2.txt`, and so on. A stem that already ends in `_<digits>` is
//! treated as `<base>_<n>`, so repeated collisions bump the counter instead of
//! chaining suffixes (`report_1.txt` never becomes `report_1_1.txt`).
//!
//! Existence is checked before the move happens. Another process creating the
//! same name between the check and the move can still win the race; moves are
//! sequential within a run, so this only matters when two processes sort the
//! same folder at once.

use regex::bytes::Regex;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

// Byte-level so stems that are not valid UTF-8 still match.
static NUMBERED_STEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s-u)^(?P<base>.*)_(?P<n>[0-9]+)$").expect("numbered stem pattern is valid")
});

/// Returns a path that does not exist at call time, derived from `desired`.
///
/// If `desired` is free it is returned unchanged. Names are handled as
/// [`OsStr`], so bytes that are not valid UTF-8 survive the rename.
///
/// # Examples
///
/// ```
/// use foldersort::resolver::resolve;
/// use std::path::Path;
///
/// let free = Path::new("/nonexistent/dir/report.txt");
/// assert_eq!(resolve(free), free);
/// ```
pub fn resolve(desired: &Path) -> PathBuf {
    if !occupied(desired) {
        return desired.to_path_buf();
    }

    let parent = desired.parent().unwrap_or_else(|| Path::new(""));
    let base = base_name(desired.file_stem().unwrap_or_default());
    let extension = desired.extension();

    let mut counter: u64 = 1;
    loop {
        let candidate = parent.join(numbered_name(base, counter, extension));
        if !occupied(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn numbered_name(base: &OsStr, counter: u64, extension: Option<&OsStr>) -> OsString {
    let mut name = base.to_os_string();
    name.push(format!("_{}", counter));
    if let Some(extension) = extension {
        name.push(".");
        name.push(extension);
    }
    name
}

/// Strips a trailing `_<digits>` from a file stem.
///
/// ```
/// use foldersort::resolver::base_name;
/// use std::ffi::OsStr;
///
/// assert_eq!(base_name(OsStr::new("report_1")), "report");
/// assert_eq!(base_name(OsStr::new("report")), "report");
/// assert_eq!(base_name(OsStr::new("2024_report")), "2024_report");
/// ```
pub fn base_name(stem: &OsStr) -> &OsStr {
    let bytes = stem.as_encoded_bytes();
    match NUMBERED_STEM.captures(bytes).and_then(|caps| caps.name("base")) {
        // SAFETY: the match ends right before an ASCII `_`, and splitting
        // encoded bytes on an ASCII character yields a valid OsStr.
        Some(base) => unsafe { OsStr::from_encoded_bytes_unchecked(&bytes[..base.end()]) },
        None => stem,
    }
}

// Dangling symlinks count as occupied.
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
