//! Error types shared by the collector, the mover and the organize engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning a directory or organizing its files.
///
/// `Scan` and `FolderCreate` are always recovered by the engine (logged, run
/// continues). `Move` is recovered or fatal depending on
/// [`OrganizeOptions::skip_errors`](crate::config::OrganizeOptions). `InvalidRoot`
/// and `Unexpected` always end the run.
#[derive(Error, Debug)]
pub enum OrganizeError {
    /// The root path is missing or is not a directory.
    #[error("Invalid root {}: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    /// A directory could not be enumerated during collection.
    #[error("Failed to scan {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A category folder could not be created under the root.
    #[error("Failed to create folder {}: {source}", path.display())]
    FolderCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be moved to its category folder.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Anything else that went wrong inside the run loop.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl OrganizeError {
    /// Returns true for a move that failed because of missing permissions.
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            Self::Move { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied
        )
    }
}

impl From<walkdir::Error> for OrganizeError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        Self::Scan { path, source }
    }
}

/// Errors that can occur while loading the options file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested options file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The options file is not valid TOML or has the wrong shape.
    #[error("Invalid configuration in {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    /// The options file exists but could not be read.
    #[error("IO error reading configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, OrganizeError>;
