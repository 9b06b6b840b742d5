//! foldersort - sort a directory's files into per-category subfolders
//!
//! This library classifies files by extension against a static category table,
//! collects candidates (optionally recursively, skipping folders it created
//! itself), picks collision-free destination names, and runs a cancellable,
//! progress-reporting move loop that reports through a notification sink.

pub mod cli;
pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod resolver;

pub use config::{OrganizeOptions, Settings};
pub use engine::{OrganizeHandle, OrganizeResult, RunFailure, RunOutcome, RunState, plan, run, spawn};
pub use error::{ConfigError, OrganizeError};
pub use events::{Event, NotificationSink};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::FileOrganizer;

pub use cli::{Cli, run_cli};
