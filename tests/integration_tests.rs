use clap::Parser;
use crossbeam::channel::unbounded;
use foldersort::cli::{Cli, CliError, organize, run_cli};
use foldersort::engine::{self, STATUS_COMPLETED, STATUS_NO_FILES, STATUS_STOPPED};
/// Integration tests for foldersort
///
/// These tests simulate real-world usage scenarios, testing the complete
/// end-to-end functionality of the organize engine and its command line.
///
/// Test categories:
/// 1. Basic organization workflows
/// 2. Recursive collection and repeated runs
/// 3. Name collisions
/// 4. Cancellation and error policy
/// 5. Command line, dry run and options file
use foldersort::output::EventRenderer;
use foldersort::{
    Event, NotificationSink, OrganizeError, OrganizeOptions, RunOutcome, RunState,
};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture that sets up a temporary directory with configurable
/// file structure for testing.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with a temporary directory.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    /// Get the path to the test directory.
    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file (and any missing parent directories) with text content.
    fn create_file(&self, rel_path: &str, content: &str) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
    }

    /// Create several files at once.
    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_file(name, name);
        }
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_dir(),
            "Directory should exist: {}",
            path.display()
        );
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_file(),
            "File should exist: {}",
            path.display()
        );
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    /// Count regular files directly in the test directory.
    fn count_files(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .count()
    }

    /// Count directories directly in the test directory.
    fn count_dirs(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .count()
    }

    /// Run the engine synchronously and return its result with every event.
    fn organize(
        &self,
        options: OrganizeOptions,
    ) -> (Result<foldersort::OrganizeResult, foldersort::RunFailure>, Vec<Event>) {
        let (tx, rx) = unbounded();
        let result = engine::run(self.path(), &options, &tx, &RunState::new());
        drop(tx);
        (result, rx.iter().collect())
    }
}

fn flat() -> OrganizeOptions {
    OrganizeOptions {
        recursive: false,
        skip_errors: true,
    }
}

fn recursive() -> OrganizeOptions {
    OrganizeOptions {
        recursive: true,
        skip_errors: true,
    }
}

fn last_status(events: &[Event]) -> Option<&str> {
    events.iter().rev().find_map(|e| match e {
        Event::Status(s) => Some(s.as_str()),
        _ => None,
    })
}

fn progress_values(events: &[Event]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Progress(p) => Some(*p),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Test Suite 1: Basic Organization
// ============================================================================

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    let (result, events) = fixture.organize(flat());
    let result = result.expect("Should succeed on empty directory");

    assert_eq!(result.moved, 0);
    assert_eq!(result.skipped, 0);
    assert_eq!(result.errored, 0);
    assert_eq!(result.outcome, RunOutcome::NoFiles);
    assert_eq!(last_status(&events), Some(STATUS_NO_FILES));
    assert_eq!(fixture.count_dirs(), 0, "Should have no subdirectories");
    assert!(events.iter().any(|e| matches!(e, Event::Stats(_))));
}

#[test]
fn test_organize_image_document_and_unknown() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.txt", "c.unknownext"]);

    let (result, events) = fixture.organize(flat());
    let result = result.expect("Organizing should succeed");

    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Documents/b.txt");
    fixture.assert_file_exists("Others/c.unknownext");
    fixture.assert_file_not_exists("a.jpg");
    assert_eq!((result.moved, result.skipped, result.errored), (3, 0, 0));
    assert_eq!(progress_values(&events).last(), Some(&100));
    assert_eq!(last_status(&events), Some(STATUS_COMPLETED));
}

#[test]
fn test_organize_creates_every_category_folder() {
    let fixture = TestFixture::new();
    fixture.create_file("song.mp3", "x");

    let (result, _) = fixture.organize(flat());
    result.expect("Organizing should succeed");

    for category in foldersort::Category::ALL {
        fixture.assert_dir_exists(category.dir_name());
    }
}

#[test]
fn test_organize_uppercase_extensions() {
    let fixture = TestFixture::new();
    fixture.create_files(&["PHOTO.JPG", "Setup.EXE", "Movie.Mkv"]);

    let (result, _) = fixture.organize(flat());
    assert_eq!(result.unwrap().moved, 3);

    fixture.assert_file_exists("Images/PHOTO.JPG");
    fixture.assert_file_exists("Executables/Setup.EXE");
    fixture.assert_file_exists("Videos/Movie.Mkv");
}

#[test]
fn test_organize_many_files() {
    let fixture = TestFixture::new();
    for i in 0..50 {
        let name = match i % 5 {
            0 => format!("image_{}.png", i),
            1 => format!("doc_{}.txt", i),
            2 => format!("audio_{}.mp3", i),
            3 => format!("archive_{}.zip", i),
            _ => format!("script_{}.py", i),
        };
        fixture.create_file(&name, "content");
    }

    let (result, events) = fixture.organize(flat());
    let result = result.unwrap();

    assert_eq!(result.moved, 50);
    assert_eq!(fixture.count_files(), 0, "All files should leave the root");
    let progress = progress_values(&events);
    assert_eq!(progress.len(), 50);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(progress.last(), Some(&100));
}

#[test]
fn test_flat_mode_leaves_subdirectories_alone() {
    let fixture = TestFixture::new();
    fixture.create_file("top.pdf", "x");
    fixture.create_file("nested/inner.pdf", "x");

    let (result, _) = fixture.organize(flat());
    assert_eq!(result.unwrap().moved, 1);

    fixture.assert_file_exists("Documents/top.pdf");
    fixture.assert_file_exists("nested/inner.pdf");
}

// ============================================================================
// Test Suite 2: Recursive Collection and Repeated Runs
// ============================================================================

#[test]
fn test_recursive_pulls_files_up_to_root_categories() {
    let fixture = TestFixture::new();
    fixture.create_file("nested/inner.pdf", "x");
    fixture.create_file("nested/deeper/clip.mov", "x");

    let (result, _) = fixture.organize(recursive());
    assert_eq!(result.unwrap().moved, 2);

    fixture.assert_file_exists("Documents/inner.pdf");
    fixture.assert_file_exists("Videos/clip.mov");
    fixture.assert_dir_exists("nested/deeper");
}

#[test]
fn test_recursive_never_enters_category_folders() {
    let fixture = TestFixture::new();
    fixture.create_file("Images/already.jpg", "sorted");
    fixture.create_file("Images/album/also.jpg", "sorted");
    fixture.create_file("new.jpg", "new");

    let (result, _) = fixture.organize(recursive());
    let result = result.unwrap();

    assert_eq!(result.total, 1);
    assert_eq!(result.moved, 1);
    fixture.assert_file_exists("Images/already.jpg");
    fixture.assert_file_exists("Images/album/also.jpg");
    fixture.assert_file_exists("Images/new.jpg");
}

#[test]
fn test_second_run_finds_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.doc", "c.rar"]);

    let (first, _) = fixture.organize(recursive());
    assert_eq!(first.unwrap().moved, 3);

    let (second, events) = fixture.organize(recursive());
    assert_eq!(second.unwrap().outcome, RunOutcome::NoFiles);
    assert_eq!(last_status(&events), Some(STATUS_NO_FILES));
}

// ============================================================================
// Test Suite 3: Name Collisions
// ============================================================================

#[test]
fn test_collision_with_existing_file_gets_suffix() {
    let fixture = TestFixture::new();
    fixture.create_file("Documents/report.txt", "old");
    fixture.create_file("report.txt", "new");

    let (result, _) = fixture.organize(flat());
    assert_eq!(result.unwrap().moved, 1);

    assert_eq!(fixture.read("Documents/report.txt"), "old");
    assert_eq!(fixture.read("Documents/report_1.txt"), "new");
}

#[test]
fn test_repeated_collisions_increment_instead_of_chaining() {
    let fixture = TestFixture::new();
    fixture.create_file("Documents/report.txt", "first");
    fixture.create_file("Documents/report_1.txt", "second");
    fixture.create_file("report.txt", "third");

    let (result, _) = fixture.organize(flat());
    result.unwrap();

    assert_eq!(fixture.read("Documents/report_2.txt"), "third");
    fixture.assert_file_not_exists("Documents/report_1_1.txt");
}

#[test]
fn test_same_name_from_different_subfolders() {
    let fixture = TestFixture::new();
    fixture.create_file("one/notes.md", "one");
    fixture.create_file("two/notes.md", "two");
    fixture.create_file("three/notes.md", "three");

    let (result, _) = fixture.organize(recursive());
    assert_eq!(result.unwrap().moved, 3);

    let mut contents = vec![
        fixture.read("Documents/notes.md"),
        fixture.read("Documents/notes_1.md"),
        fixture.read("Documents/notes_2.md"),
    ];
    contents.sort();
    assert_eq!(contents, vec!["one", "three", "two"]);
}

// ============================================================================
// Test Suite 4: Cancellation and Error Policy
// ============================================================================

/// Requests a stop as soon as the first move has been reported.
struct StopAfterFirstMove {
    state: RunState,
    events: Mutex<Vec<Event>>,
}

impl NotificationSink for StopAfterFirstMove {
    fn notify(&self, event: Event) {
        if matches!(&event, Event::Log(line) if line.contains(" -> ")) {
            self.state.request_stop();
        }
        self.events.lock().unwrap().push(event);
    }
}

#[test]
fn test_cancel_after_first_file() {
    let fixture = TestFixture::new();
    fixture.create_files(&["1.txt", "2.txt", "3.txt", "4.txt", "5.txt"]);
    let state = RunState::new();
    let sink = StopAfterFirstMove {
        state: state.clone(),
        events: Mutex::new(Vec::new()),
    };

    let result = engine::run(fixture.path(), &flat(), &sink, &state).unwrap();

    assert_eq!(result.outcome, RunOutcome::Stopped);
    assert!(result.moved == 1 || result.moved == 2);
    assert_eq!(fixture.count_files(), 5 - result.moved);
    let events = sink.events.lock().unwrap();
    assert_eq!(last_status(&events), Some(STATUS_STOPPED));
}

#[test]
fn test_stop_through_spawned_handle() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.txt", "b.txt"]);
    let (tx, rx) = unbounded();

    let state = RunState::new();
    let handle = engine::spawn(fixture.path().to_path_buf(), flat(), tx, state.clone()).unwrap();
    let stopper = handle.state();
    stopper.request_stop();
    let events: Vec<Event> = rx.iter().collect();
    let result = handle.join().unwrap();

    // The stop may land before or after the worker reaches the loop.
    match result.outcome {
        RunOutcome::Stopped => assert_eq!(last_status(&events), Some(STATUS_STOPPED)),
        RunOutcome::Completed => assert_eq!(result.moved, 2),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(fixture.count_files(), 2 - result.moved);
    assert!(!state.is_active());
}

#[test]
fn test_skip_errors_keeps_going() {
    let fixture = TestFixture::new();
    // A file where the Audio folder should be makes every audio move fail.
    fixture.create_file("Audio", "blocker");
    fixture.create_files(&["a.mp3", "b.wav", "c.pdf"]);

    let (result, events) = fixture.organize(flat());
    let result = result.unwrap();

    assert_eq!(result.outcome, RunOutcome::Completed);
    assert_eq!(result.errored, 2);
    assert_eq!(result.moved, 2);
    fixture.assert_file_exists("a.mp3");
    fixture.assert_file_exists("b.wav");
    fixture.assert_file_exists("Documents/c.pdf");
    fixture.assert_file_exists("Others/Audio");
    assert!(events.contains(&Event::Stats(
        "total: 4 | moved: 2 | skipped: 0 | errored: 2".to_string()
    )));
}

#[test]
fn test_fail_fast_stops_at_first_failure() {
    let fixture = TestFixture::new();
    fixture.create_file("Audio", "blocker");
    fixture.create_files(&["a.mp3", "b.pdf", "c.jpg"]);

    let (result, events) = fixture.organize(OrganizeOptions {
        recursive: false,
        skip_errors: false,
    });
    let failure = result.expect_err("Run should abort");

    assert!(matches!(failure.error, OrganizeError::Move { .. }));
    assert_eq!(failure.result.outcome, RunOutcome::Failed);
    assert_eq!(failure.result.errored, 1);
    fixture.assert_file_exists("a.mp3");
    assert_eq!(fixture.count_files(), 4 - failure.result.moved);
    assert_eq!(last_status(&events), Some("error"));
    assert!(events.iter().any(|e| matches!(e, Event::Stats(_))));
}

#[test]
fn test_invalid_root_reports_failure() {
    let fixture = TestFixture::new();
    let missing: PathBuf = fixture.path().join("nope");

    let failure =
        engine::run(&missing, &flat(), &foldersort::events::NullSink, &RunState::new())
            .unwrap_err();

    assert!(matches!(failure.error, OrganizeError::InvalidRoot { .. }));
}

// ============================================================================
// Test Suite 5: Command Line
// ============================================================================

/// An empty options file, so the run ignores any options file on this machine.
fn empty_options_file() -> (TempDir, String) {
    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = config_dir.path().join("options.toml");
    fs::write(&config_path, "").unwrap();
    let config = config_path.to_string_lossy().to_string();
    (config_dir, config)
}

#[derive(Default)]
struct CollectingRenderer {
    events: Vec<Event>,
    finished: bool,
}

impl EventRenderer for CollectingRenderer {
    fn render(&mut self, event: &Event) {
        self.events.push(event.clone());
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

#[test]
fn test_cli_dry_run_does_not_move() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.txt"]);

    let (_config_dir, config) = empty_options_file();

    let dir = fixture.path().to_string_lossy().to_string();
    let cli = Cli::parse_from([
        "foldersort",
        dir.as_str(),
        "--dry-run",
        "--config",
        config.as_str(),
    ]);
    run_cli(&cli, RunState::new()).expect("Dry run should succeed");

    fixture.assert_file_exists("a.jpg");
    fixture.assert_file_exists("b.txt");
    assert_eq!(fixture.count_dirs(), 0);
}

#[test]
fn test_cli_organizes_with_options_file() {
    let fixture = TestFixture::new();
    fixture.create_file("nested/deep.jpg", "x");
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("options.toml");
    fs::write(&config_path, "[organize]\nrecursive = true\n").unwrap();

    let dir = fixture.path().to_string_lossy().to_string();
    let config = config_path.to_string_lossy().to_string();
    let cli = Cli::parse_from(["foldersort", dir.as_str(), "--json", "--config", config.as_str()]);
    run_cli(&cli, RunState::new()).expect("Organizing should succeed");

    fixture.assert_file_exists("Images/deep.jpg");
}

#[test]
fn test_cli_fail_fast_returns_run_error() {
    let fixture = TestFixture::new();
    fixture.create_file("Audio", "blocker");
    fixture.create_file("a.mp3", "x");
    let (_config_dir, config) = empty_options_file();

    let dir = fixture.path().to_string_lossy().to_string();
    let cli = Cli::parse_from([
        "foldersort",
        dir.as_str(),
        "--json",
        "--fail-fast",
        "--config",
        config.as_str(),
    ]);

    let result = run_cli(&cli, RunState::new());
    assert!(matches!(result, Err(CliError::Run(_))));
}

#[test]
fn test_cli_missing_config_is_error() {
    let fixture = TestFixture::new();
    let dir = fixture.path().to_string_lossy().to_string();
    let missing = fixture.path().join("missing.toml");
    let missing = missing.to_string_lossy().to_string();

    let cli = Cli::parse_from(["foldersort", dir.as_str(), "--config", missing.as_str()]);

    assert!(matches!(
        run_cli(&cli, RunState::new()),
        Err(CliError::Config(_))
    ));
}

#[test]
fn test_cli_organize_runs_on_the_given_state() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.txt"]);
    let state = RunState::new();
    let mut renderer = CollectingRenderer::default();

    organize(fixture.path(), OrganizeOptions::default(), state.clone(), &mut renderer)
        .expect("Organizing should succeed");

    assert!(renderer.finished);
    assert!(!state.is_active());
    assert_eq!(
        renderer.events.last(),
        Some(&Event::Status(STATUS_COMPLETED.to_string()))
    );
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Documents/b.txt");
}

#[test]
fn test_cli_organize_honors_stop_before_start() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.txt"]);
    let state = RunState::new();
    state.request_stop();
    let mut renderer = CollectingRenderer::default();

    organize(fixture.path(), OrganizeOptions::default(), state, &mut renderer)
        .expect("A stopped command is not an error");

    assert!(renderer.events.is_empty());
    fixture.assert_file_exists("a.jpg");
    fixture.assert_file_exists("b.txt");
    assert_eq!(fixture.count_dirs(), 0);
}
