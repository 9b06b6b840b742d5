//! The organize engine.
//!
//! [`run`] drives one pass over a root directory: collect candidates,
//! pre-create the category folders, then classify and move each file in
//! collection order while emitting [`Event`](crate::events::Event)s. Files are
//! moved strictly one after another. Cancellation is cooperative and checked
//! before each file, so a file whose move has already started always finishes.
//!
//! [`spawn`] runs the same loop on a dedicated worker thread and hands back an
//! [`OrganizeHandle`] for stopping and joining it.

use crate::collector;
use crate::config::OrganizeOptions;
use crate::error::{OrganizeError, Result};
use crate::events::NotificationSink;
use crate::file_category::{Category, CategoryTable};
use crate::file_organizer::FileOrganizer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use thiserror::Error;

pub const STATUS_SCANNING: &str = "scanning";
pub const STATUS_NO_FILES: &str = "no files found";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_STOPPED: &str = "stopped";
pub const STATUS_ERROR: &str = "error";

/// Status label shown while files are being moved.
pub fn organizing_status(processed: usize, total: usize) -> String {
    format!("organizing ({}/{})", processed, total)
}

/// Shared run flag. Cloning yields another handle to the same flag.
///
/// The worker reads it before every file; any other thread may clear it to
/// request a stop.
#[derive(Debug, Clone)]
pub struct RunState {
    active: Arc<AtomicBool>,
}

impl RunState {
    /// Creates a flag in the running state.
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Asks the worker to stop before the next file.
    pub fn request_stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn activate(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The candidate list was empty.
    #[default]
    NoFiles,
    /// Every candidate was processed.
    Completed,
    /// A stop was requested before every candidate was processed.
    Stopped,
    /// The run was aborted by a fatal error.
    Failed,
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrganizeResult {
    /// Number of candidates found by the collector.
    pub total: usize,
    /// Candidates handled so far, successfully or not.
    pub processed: usize,
    pub moved: usize,
    /// Never incremented; kept so summaries always show all three outcomes.
    pub skipped: usize,
    pub errored: usize,
    pub outcome: RunOutcome,
}

impl OrganizeResult {
    /// `floor(processed / total * 100)`, or 0 for an empty run.
    pub fn progress_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.processed * 100 / self.total).min(100) as u8
    }

    /// One-line counts summary.
    pub fn summary(&self) -> String {
        format!(
            "total: {} | moved: {} | skipped: {} | errored: {}",
            self.total, self.moved, self.skipped, self.errored
        )
    }
}

impl std::fmt::Display for OrganizeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

/// A run that ended on a fatal error, with the counts gathered up to that point.
#[derive(Error, Debug)]
#[error("organize run aborted: {error}")]
pub struct RunFailure {
    #[source]
    pub error: OrganizeError,
    pub result: OrganizeResult,
}

/// Organizes the files under `root` into category folders.
///
/// Emits events to `sink` throughout and clears `state` before returning, on
/// every path. Returns the final counts, or a [`RunFailure`] if the root is
/// invalid, a move fails while `skip_errors` is off, or an unexpected error
/// occurs.
///
/// `state` is read as given and never re-armed here. A stopped or finished
/// state (including one reused from an earlier `run`) ends the run as
/// [`RunOutcome::Stopped`] before the first file is touched. Pass a fresh
/// [`RunState::new`] per call, or use [`spawn`], which re-arms the state it is
/// handed.
///
/// # Examples
///
/// ```no_run
/// use foldersort::config::OrganizeOptions;
/// use foldersort::engine::{run, RunState};
/// use foldersort::events::NullSink;
/// use std::path::Path;
///
/// let result = run(
///     Path::new("/home/user/Downloads"),
///     &OrganizeOptions::default(),
///     &NullSink,
///     &RunState::new(),
/// );
/// match result {
///     Ok(result) => println!("{}", result),
///     Err(failure) => eprintln!("{}", failure),
/// }
/// ```
pub fn run<S: NotificationSink>(
    root: &Path,
    options: &OrganizeOptions,
    sink: &S,
    state: &RunState,
) -> std::result::Result<OrganizeResult, RunFailure> {
    let organizer = Organizer {
        root,
        options,
        sink,
        state,
    };
    let outcome = organizer.execute();
    state.finish();
    outcome
}

struct Organizer<'a, S> {
    root: &'a Path,
    options: &'a OrganizeOptions,
    sink: &'a S,
    state: &'a RunState,
}

impl<S: NotificationSink> Organizer<'_, S> {
    fn execute(&self) -> std::result::Result<OrganizeResult, RunFailure> {
        let mut result = OrganizeResult::default();

        if let Err(error) = validate_root(self.root) {
            return Err(self.fail(error, result));
        }

        self.sink.status(STATUS_SCANNING);
        self.sink
            .log(format!("Scanning {} ...", self.root.display()));

        let collection = collector::collect(self.root, self.options.recursive);
        for error in &collection.errors {
            log::warn!("{}", error);
            self.sink.log(error.to_string());
        }

        result.total = collection.len();
        if collection.is_empty() {
            self.sink.log("No files to organize were found.");
            self.sink.stats(result.summary());
            self.sink.status(STATUS_NO_FILES);
            return Ok(result);
        }

        self.sink
            .log(format!("Found {} file(s), organizing...", result.total));
        self.sink.status(organizing_status(0, result.total));

        let prepared = FileOrganizer::prepare_category_dirs(self.root);
        for category in &prepared.created {
            log::debug!("created folder {}", category);
            self.sink.log(format!("Created folder: {}", category));
        }
        for (_, error) in &prepared.failed {
            log::warn!("{}", error);
            self.sink.log(error.to_string());
        }

        for file in &collection.files {
            if !self.state.is_active() {
                result.outcome = RunOutcome::Stopped;
                break;
            }

            if let Err(error) = self.process(file, &mut result) {
                return Err(self.fail(error, result));
            }

            result.processed += 1;
            self.sink.progress(result.progress_percent());
            self.sink
                .status(organizing_status(result.processed, result.total));
        }

        if result.outcome == RunOutcome::Stopped {
            self.sink.log(format!(
                "Stopped after {} of {} file(s).",
                result.processed, result.total
            ));
            self.sink.stats(result.summary());
            self.sink.status(STATUS_STOPPED);
        } else {
            result.outcome = RunOutcome::Completed;
            self.sink.log("Organizing complete!");
            self.sink.log(format!("Moved: {}", result.moved));
            self.sink.log(format!("Skipped: {}", result.skipped));
            self.sink.log(format!("Errored: {}", result.errored));
            self.sink.stats(result.summary());
            self.sink.status(STATUS_COMPLETED);
        }

        Ok(result)
    }

    /// Classifies and moves one file. Errors returned from here end the run.
    fn process(&self, file: &Path, result: &mut OrganizeResult) -> Result<()> {
        let name = display_name(file);
        let category = CategoryTable::classify_path(file);

        match FileOrganizer::move_to_category(self.root, file, category) {
            Ok(record) => {
                result.moved += 1;
                log::debug!(
                    "moved {} to {}",
                    record.original_path.display(),
                    record.new_path.display()
                );
                self.sink.log(format!("{} -> {}/", name, category));
                Ok(())
            }
            Err(error @ OrganizeError::Move { .. }) => {
                result.errored += 1;
                log::warn!("{}", error);
                if error.is_permission_denied() {
                    self.sink
                        .log(format!("Permission denied, cannot move {}: {}", name, error));
                } else {
                    self.sink.log(format!("Error moving {}: {}", name, error));
                }

                if self.options.skip_errors {
                    Ok(())
                } else {
                    Err(error)
                }
            }
            Err(error) => {
                result.errored += 1;
                self.sink
                    .log(format!("Error processing {}: {}", name, error));
                Err(error)
            }
        }
    }

    fn fail(&self, error: OrganizeError, mut result: OrganizeResult) -> RunFailure {
        result.outcome = RunOutcome::Failed;
        log::error!("organize run aborted: {}", error);
        self.sink.log(format!("Aborted: {}", error));
        self.sink.stats(result.summary());
        self.sink.status(STATUS_ERROR);
        RunFailure { error, result }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Checks that `root` exists and is a directory.
pub fn validate_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(OrganizeError::InvalidRoot {
            path: root.to_path_buf(),
            reason: "does not exist".to_string(),
        });
    }
    if !root.is_dir() {
        return Err(OrganizeError::InvalidRoot {
            path: root.to_path_buf(),
            reason: "is not a directory".to_string(),
        });
    }
    Ok(())
}

/// Handle to an organize run on its worker thread.
pub struct OrganizeHandle {
    state: RunState,
    thread: JoinHandle<std::result::Result<OrganizeResult, RunFailure>>,
}

impl OrganizeHandle {
    /// Requests a stop; the worker finishes the file it is on and returns.
    pub fn stop(&self) {
        self.state.request_stop();
    }

    /// Another handle to the run flag, e.g. for a signal handler or UI button.
    pub fn state(&self) -> RunState {
        self.state.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the worker and returns the run's result.
    ///
    /// A panicking worker is reported as [`OrganizeError::Unexpected`].
    pub fn join(self) -> std::result::Result<OrganizeResult, RunFailure> {
        let joined = self.thread.join();
        self.state.finish();

        joined.unwrap_or_else(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "worker thread panicked".to_string());
            Err(RunFailure {
                error: OrganizeError::Unexpected(message),
                result: OrganizeResult {
                    outcome: RunOutcome::Failed,
                    ..OrganizeResult::default()
                },
            })
        })
    }
}

/// Starts [`run`] on a dedicated worker thread.
///
/// `state` is switched to running before the worker starts; keep a clone (or
/// use [`OrganizeHandle::stop`]) to cancel.
pub fn spawn<S>(
    root: PathBuf,
    options: OrganizeOptions,
    sink: S,
    state: RunState,
) -> Result<OrganizeHandle>
where
    S: NotificationSink + Send + 'static,
{
    state.activate();
    let worker_state = state.clone();

    let thread = thread::Builder::new()
        .name("foldersort-worker".to_string())
        .spawn(move || run(&root, &options, &sink, &worker_state))
        .map_err(|e| {
            state.finish();
            OrganizeError::Unexpected(format!("failed to start worker thread: {}", e))
        })?;

    Ok(OrganizeHandle { state, thread })
}

/// A file and the category it would be sorted into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub category: Category,
}

/// What a run would do, computed without touching the filesystem.
#[derive(Debug, Default)]
pub struct Plan {
    pub moves: Vec<PlannedMove>,
    pub scan_errors: Vec<OrganizeError>,
}

impl Plan {
    /// Number of planned moves per category, in table order.
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for planned in &self.moves {
            *counts.entry(planned.category).or_insert(0) += 1;
        }
        counts
    }
}

/// Collects and classifies candidates under `root` without moving anything.
pub fn plan(root: &Path, recursive: bool) -> Result<Plan> {
    validate_root(root)?;

    let collection = collector::collect(root, recursive);
    let moves = collection
        .files
        .into_iter()
        .map(|source| {
            let category = CategoryTable::classify_path(&source);
            PlannedMove { source, category }
        })
        .collect();

    Ok(Plan {
        moves,
        scan_errors: collection.errors,
    })
}
