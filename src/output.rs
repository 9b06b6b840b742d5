//! Output formatting and styling module.
//!
//! Renders engine events for a terminal. [`ConsoleRenderer`] turns log events
//! into timestamped lines, drives a progress bar from progress events and shows
//! the status text as the bar message. [`JsonRenderer`] prints one JSON object
//! per event for scripts. [`OutputFormatter`] holds the plain styled helpers
//! used outside of a run.

use crate::engine::{Plan, STATUS_COMPLETED, STATUS_ERROR, STATUS_NO_FILES, STATUS_STOPPED};
use crate::events::Event;
use crate::file_category::Category;
use chrono::{DateTime, Local};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::io::Write;

/// Something that shows engine events to a user.
pub trait EventRenderer {
    fn render(&mut self, event: &Event);

    /// Called once after the last event.
    fn finish(&mut self) {}
}

impl<R: EventRenderer + ?Sized> EventRenderer for &mut R {
    fn render(&mut self, event: &Event) {
        (**self).render(event);
    }

    fn finish(&mut self) {
        (**self).finish();
    }
}

/// Prefixes a log line with a local `[HH:MM:SS]` timestamp.
pub fn timestamped(time: DateTime<Local>, message: &str) -> String {
    format!("[{}] {}", time.format("%H:%M:%S"), message)
}

/// Interactive terminal renderer.
pub struct ConsoleRenderer {
    progress: ProgressBar,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self {
            progress: OutputFormatter::create_progress_bar(100),
        }
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRenderer for ConsoleRenderer {
    fn render(&mut self, event: &Event) {
        match event {
            Event::Log(message) => {
                self.progress
                    .println(timestamped(Local::now(), message).dimmed().to_string());
            }
            Event::Progress(percent) => self.progress.set_position(u64::from(*percent)),
            Event::Status(status) => self.progress.set_message(status.clone()),
            Event::Stats(summary) => {
                self.progress.println(summary.bold().to_string());
            }
        }

        if let Event::Status(status) = event {
            match status.as_str() {
                STATUS_COMPLETED => self.progress.finish_with_message(status.green().to_string()),
                STATUS_STOPPED | STATUS_NO_FILES => {
                    self.progress.abandon_with_message(status.yellow().to_string())
                }
                STATUS_ERROR => self.progress.abandon_with_message(status.red().to_string()),
                _ => {}
            }
        }
    }

    fn finish(&mut self) {
        if !self.progress.is_finished() {
            self.progress.abandon();
        }
    }
}

/// Machine-readable renderer: one JSON object per line.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventRenderer for JsonRenderer<W> {
    fn render(&mut self, event: &Event) {
        let mut line = match serde_json::to_value(event) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("failed to serialize event: {}", e);
                return;
            }
        };
        line["timestamp"] = json!(Local::now().to_rfc3339());

        if let Err(e) = writeln!(self.out, "{}", line) {
            log::warn!("failed to write event: {}", e);
        }
    }

    fn finish(&mut self) {
        let _ = self.out.flush();
    }
}

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for operations
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// OutputFormatter::error("Failed to organize file");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates and returns a progress bar for file operations.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_with_message("Completed!");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the static category table.
    pub fn category_table() {
        Self::header("CATEGORIES");
        let width = Category::ALL
            .iter()
            .map(|c| c.dir_name().len())
            .max()
            .unwrap_or(0)
            .max(8);

        for category in Category::ALL {
            let extensions = if category.extensions().is_empty() {
                "(everything else)".dimmed().to_string()
            } else {
                category.extensions().join(", ")
            };
            println!(
                "{:<width$} | {} {}",
                category.dir_name().bold(),
                format!("{}:", category.description()).cyan(),
                extensions,
                width = width
            );
        }
    }

    /// Prints a dry-run listing followed by a per-category summary table.
    pub fn plan(plan: &Plan) {
        for planned in &plan.moves {
            let name = planned
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| planned.source.display().to_string());
            Self::dry_run_notice(&format!("{} -> {}/", name, planned.category));
        }

        for error in &plan.scan_errors {
            Self::warning(&error.to_string());
        }

        Self::header("SUMMARY");
        let counts = plan.category_counts();
        let width = counts
            .keys()
            .map(|c| c.dir_name().len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));
        for (category, count) in &counts {
            let file_word = if *count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category.dir_name(),
                count.to_string().green(),
                file_word,
                width = width
            );
        }
        println!("{}", "-".repeat(width + 10));
        let total = plan.moves.len();
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            if total == 1 { "file" } else { "files" },
            width = width
        );
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}
