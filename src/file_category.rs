/// File categorization by extension.
///
/// This module holds the static category table: an ordered list of categories,
/// each with the set of lowercase extensions it recognizes, and a catch-all
/// category that is checked last.
///
/// # Examples
///
/// ```
/// use foldersort::file_category::{Category, CategoryTable};
///
/// assert_eq!(CategoryTable::classify("jpg"), Category::Image);
/// assert_eq!(CategoryTable::classify(".PDF"), Category::Document);
/// assert_eq!(CategoryTable::classify("unknownext"), Category::Other);
/// ```
use serde::Serialize;
use std::path::Path;

/// Represents a file category and the folder it is sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    /// Image files (JPG, PNG, GIF, etc.)
    Image,
    /// Document files (PDF, DOCX, TXT, etc.)
    Document,
    /// Archive files (ZIP, RAR, 7Z, etc.)
    Archive,
    /// Video files (MP4, MKV, AVI, etc.)
    Video,
    /// Audio files (MP3, WAV, FLAC, etc.)
    Audio,
    /// Source code and markup files
    Program,
    /// Executables and installers
    Executable,
    /// Everything else
    Other,
}

impl Category {
    /// All categories in lookup order. The fallback is always last.
    pub const ALL: [Category; 8] = [
        Category::Image,
        Category::Document,
        Category::Archive,
        Category::Video,
        Category::Audio,
        Category::Program,
        Category::Executable,
        Category::Other,
    ];

    /// The category used when no extension set matches.
    pub const FALLBACK: Category = Category::Other;

    /// Returns the folder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldersort::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "Images");
    /// assert_eq!(Category::Other.dir_name(), "Others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "Images",
            Category::Document => "Documents",
            Category::Archive => "Archives",
            Category::Video => "Videos",
            Category::Audio => "Audio",
            Category::Program => "Programs",
            Category::Executable => "Executables",
            Category::Other => "Others",
        }
    }

    /// Returns a human-readable description of this category.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Image => "Image files",
            Category::Document => "Document files",
            Category::Archive => "Archive files",
            Category::Video => "Video files",
            Category::Audio => "Audio files",
            Category::Program => "Source code files",
            Category::Executable => "Executables and installers",
            Category::Other => "Other files",
        }
    }

    /// Returns the lowercase extensions (without the leading dot) this category
    /// recognizes. Empty for the fallback.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Category::Image => &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "svg"],
            Category::Document => &[
                "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "md", "rtf", "csv",
            ],
            Category::Archive => &["zip", "rar", "7z", "tar", "gz", "bz2", "xz"],
            Category::Video => &[
                "mp4", "avi", "mkv", "mov", "flv", "wmv", "mpeg", "mpg", "webm",
            ],
            Category::Audio => &["mp3", "wav", "m4a", "flac", "aac", "ogg", "wma"],
            Category::Program => &[
                "py", "js", "java", "cpp", "c", "html", "css", "php", "json", "xml",
            ],
            Category::Executable => &["exe", "msi", "bat", "sh", "app", "dmg"],
            Category::Other => &[],
        }
    }

    /// Looks up the category whose folder is named exactly `name`.
    ///
    /// The comparison is case-sensitive, so `images` is not a category folder.
    pub fn from_dir_name(name: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.dir_name() == name)
    }

    /// Returns true if `name` is exactly the folder name of some category.
    pub fn is_category_dir(name: &str) -> bool {
        Self::from_dir_name(name).is_some()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The static extension lookup table.
///
/// Lookups walk [`Category::ALL`] in declaration order and return the first
/// category whose extension set contains the normalized extension, so the
/// mapping stays a total function even if two sets ever overlap.
pub struct CategoryTable;

impl CategoryTable {
    /// Maps an extension to its category.
    ///
    /// The extension is lowercased and any leading dot is stripped before the
    /// lookup. Unknown or empty extensions map to [`Category::FALLBACK`].
    ///
    /// # Examples
    ///
    /// ```
    /// use foldersort::file_category::{Category, CategoryTable};
    ///
    /// assert_eq!(CategoryTable::classify("JPG"), CategoryTable::classify("jpg"));
    /// assert_eq!(CategoryTable::classify(""), Category::Other);
    /// ```
    pub fn classify(extension: &str) -> Category {
        let normalized = extension.trim_start_matches('.').to_lowercase();
        if normalized.is_empty() {
            return Category::FALLBACK;
        }

        Category::ALL
            .into_iter()
            .find(|category| category.extensions().contains(&normalized.as_str()))
            .unwrap_or(Category::FALLBACK)
    }

    /// Classifies a file by the extension of its path.
    pub fn classify_path(path: &Path) -> Category {
        Self::classify(&extension_of(path))
    }
}

/// Returns the last extension of `path`, lowercased and without the dot.
///
/// Files without an extension, and dotfiles such as `.bashrc`, yield an empty
/// string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
