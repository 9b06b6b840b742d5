//! Command-line interface module for foldersort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Options file loading and flag overrides
//! - Starting the organize engine on a worker thread
//! - Rendering engine events on the calling thread
//! - Turning Ctrl-C into a cooperative stop

use crate::config::Settings;
use crate::engine::{self, RunFailure, RunState};
use crate::error::{ConfigError, OrganizeError};
use crate::events::Event;
use crate::output::{ConsoleRenderer, EventRenderer, JsonRenderer, OutputFormatter};
use clap::Parser;
use crossbeam::channel::unbounded;
use std::path::{Path, PathBuf};
use std::thread;
use thiserror::Error;

/// Sort the files of a directory into per-category subfolders.
#[derive(Parser, Debug, Clone)]
#[command(name = "foldersort", version, about)]
pub struct Cli {
    /// Directory to organize
    #[arg(required_unless_present = "list_categories")]
    pub directory: Option<PathBuf>,

    /// Also organize files in subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Abort the run on the first file that cannot be moved
    #[arg(long)]
    pub fail_fast: bool,

    /// Show where files would go without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print events as JSON lines instead of a progress bar
    #[arg(long)]
    pub json: bool,

    /// Path to an options file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the category table and exit
    #[arg(long)]
    pub list_categories: bool,
}

/// Errors surfaced by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Organize(#[from] OrganizeError),

    #[error("{0}")]
    Run(#[from] RunFailure),

    #[error("No directory given")]
    MissingDirectory,
}

/// Runs the CLI application with parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use foldersort::cli::{run_cli, Cli};
/// use foldersort::engine::RunState;
///
/// let cli = Cli::parse_from(["foldersort", "/path/to/directory", "--recursive"]);
/// if let Err(e) = run_cli(&cli, RunState::new()) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli, state: RunState) -> Result<(), CliError> {
    if cli.list_categories {
        OutputFormatter::category_table();
        return Ok(());
    }

    let directory = cli.directory.as_deref().ok_or(CliError::MissingDirectory)?;
    engine::validate_root(directory)?;

    let settings = Settings::load(cli.config.as_deref())?;
    let options = settings.options_with_overrides(cli.recursive, cli.fail_fast);
    log::debug!("options: {:?}", options);

    if cli.dry_run {
        return dry_run(directory, options.recursive);
    }

    if cli.json {
        let stdout = std::io::stdout();
        organize(directory, options, state, JsonRenderer::new(stdout.lock()))
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", directory.display()));
        organize(directory, options, state, ConsoleRenderer::new())
    }
}

/// Starts the engine on a worker and renders its events until it finishes.
///
/// `state` is the run's stop flag; clearing it from another thread (see
/// [`stop_on_ctrl_c`]) ends the run after the file being moved.
pub fn organize<R: EventRenderer>(
    directory: &Path,
    options: crate::config::OrganizeOptions,
    state: RunState,
    mut renderer: R,
) -> Result<(), CliError> {
    // `spawn` re-arms the flag, so honor a stop that came in before it.
    if !state.is_active() {
        OutputFormatter::warning("Stopped before any file was moved.");
        return Ok(());
    }

    let (tx, rx) = unbounded::<Event>();
    let handle = engine::spawn(directory.to_path_buf(), options, tx, state)?;

    // The channel closes when the worker drops its sender.
    for event in rx.iter() {
        renderer.render(&event);
    }
    renderer.finish();

    handle.join()?;
    Ok(())
}

/// Requests a stop on `state` when the process receives Ctrl-C.
///
/// The listener lives on its own thread for the rest of the process. The
/// first Ctrl-C lets the file being moved finish; a second one exits at once.
pub fn stop_on_ctrl_c(state: RunState) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("foldersort-signal".to_string())
        .spawn(move || {
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                log::warn!("interrupt received, stopping after the current file");
                state.request_stop();

                if tokio::signal::ctrl_c().await.is_ok() {
                    std::process::exit(130);
                }
            });
        })?;
    Ok(())
}

fn dry_run(directory: &Path, recursive: bool) -> Result<(), CliError> {
    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", directory.display()));

    let plan = engine::plan(directory, recursive)?;
    if plan.moves.is_empty() {
        OutputFormatter::warning("No files found to organize.");
        return Ok(());
    }

    OutputFormatter::plan(&plan);
    OutputFormatter::success("Dry run complete. No files were modified.");
    Ok(())
}
