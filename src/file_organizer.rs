/// Filesystem side of organizing: category folders and file moves.
///
/// This module creates the per-category folders under a root directory and
/// moves single files into them, picking a collision-free name on the way.
use crate::error::{OrganizeError, Result};
use crate::file_category::Category;
use crate::resolver;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Records a single completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Where the file was before the move.
    pub original_path: PathBuf,
    /// Where the file is now, after collision resolution.
    pub new_path: PathBuf,
    /// The category the file was sorted into.
    pub category: Category,
}

/// Result of pre-creating the category folders.
#[derive(Debug, Default)]
pub struct PreparedDirs {
    /// Folders that did not exist before and were created.
    pub created: Vec<Category>,
    /// Folders that could not be created. Always `OrganizeError::FolderCreate`.
    pub failed: Vec<(Category, OrganizeError)>,
}

/// Moves files into category folders.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Creates one folder per category under `root`, including the fallback.
    ///
    /// Folders that already exist count as success. A failure for one category
    /// is recorded and the remaining folders are still attempted.
    pub fn prepare_category_dirs(root: &Path) -> PreparedDirs {
        let mut prepared = PreparedDirs::default();

        for category in Category::ALL {
            let path = root.join(category.dir_name());
            if path.is_dir() {
                continue;
            }

            match fs::create_dir(&path) {
                Ok(()) => prepared.created.push(category),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => {}
                Err(e) => prepared
                    .failed
                    .push((category, OrganizeError::FolderCreate { path, source: e })),
            }
        }

        prepared
    }

    /// Moves `file_path` into `root/<category>/`, renaming it if the name is taken.
    ///
    /// The category folder is expected to exist already; see
    /// [`FileOrganizer::prepare_category_dirs`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use foldersort::file_category::Category;
    /// use foldersort::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let result = FileOrganizer::move_to_category(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/image.png"),
    ///     Category::Image,
    /// );
    ///
    /// match result {
    ///     Ok(record) => println!("Moved to {}", record.new_path.display()),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn move_to_category(
        root: &Path,
        file_path: &Path,
        category: Category,
    ) -> Result<MoveRecord> {
        let file_name = file_path.file_name().ok_or_else(|| {
            OrganizeError::Unexpected(format!(
                "{} has no file name component",
                file_path.display()
            ))
        })?;

        let desired = root.join(category.dir_name()).join(file_name);
        let destination = resolver::resolve(&desired);

        Self::move_file(file_path, &destination)?;

        Ok(MoveRecord {
            original_path: file_path.to_path_buf(),
            new_path: destination,
            category,
        })
    }

    /// Moves a single file, falling back to copy and delete across filesystems.
    pub fn move_file(from: &Path, to: &Path) -> Result<()> {
        let move_error = |source| OrganizeError::Move {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        };

        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::CrossesDevices => {
                copy_then_remove(from, to).map_err(move_error)
            }
            Err(e) => Err(move_error(e)),
        }
    }
}

// Never leaves a copy behind on failure: a stray file at `to` would occupy the
// name for later collision checks.
fn copy_then_remove(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Err(e) = fs::copy(from, to) {
        let _ = fs::remove_file(to);
        return Err(e);
    }
    if let Err(e) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        return Err(e);
    }
    Ok(())
}
