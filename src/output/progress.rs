//! Progress reporting functionality
//!
//! Progress bars are drawn on stderr so they never mix with formatted
//! output written to stdout.

use crate::core::parallel::ProgressUpdate;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// Progress reporter for long-running operations
pub struct ProgressReporter {
    quiet: bool,
    verbose: bool,
    multi_progress: Arc<MultiProgress>,
    main_progress_bar: Option<ProgressBar>,
    current_operation: Arc<Mutex<String>>,
}

impl ProgressReporter {
    /// Create a new progress reporter; a quiet reporter draws nothing
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let multi_progress = Arc::new(MultiProgress::new());

        let main_progress_bar = if quiet {
            None
        } else {
            let bar = multi_progress.add(ProgressBar::new(0));
            match ProgressStyle::default_bar().template(BAR_TEMPLATE) {
                Ok(style) => bar.set_style(style.progress_chars("#>-")),
                Err(e) => tracing::debug!(error = %e, "using default progress style"),
            }
            Some(bar)
        };

        Self {
            quiet,
            verbose,
            multi_progress,
            main_progress_bar,
            current_operation: Arc::new(Mutex::new(String::new())),
        }
    }

    /// Start a new progress operation
    pub fn start(&self, total: usize, operation: &str) {
        if let Ok(mut current_op) = self.current_operation.lock() {
            *current_op = operation.to_string();
        }

        if self.verbose {
            tracing::info!(total, "{}", operation);
        }

        if let Some(bar) = &self.main_progress_bar {
            bar.reset();
            bar.set_length(total as u64);
            bar.set_position(0);
            bar.set_message(operation.to_string());
        }
    }

    /// Update progress
    pub fn update(&self, current: usize, total: usize, message: &str) {
        if self.verbose {
            tracing::debug!(current, total, "{}", message);
        }

        if let Some(bar) = &self.main_progress_bar {
            bar.set_length(total as u64);
            bar.set_position(current as u64);

            // Keep the operation name unless the message says something new
            if let Ok(current_op) = self.current_operation.lock() {
                if !message.is_empty() && message != *current_op {
                    bar.set_message(message.to_string());
                }
            }
        }
    }

    /// Update progress from a ProgressUpdate
    pub fn update_from(&self, progress: ProgressUpdate) {
        self.update(progress.current, progress.total, &progress.message);
    }

    /// Finish the progress operation
    pub fn finish(&self, message: &str) {
        if self.verbose {
            tracing::info!("{}", message);
        }

        if let Some(bar) = &self.main_progress_bar {
            bar.finish_and_clear();
        }
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Create a progress callback function that updates a ProgressReporter
pub fn create_progress_callback(
    reporter: Arc<ProgressReporter>,
) -> impl Fn(ProgressUpdate) + Send + Sync {
    move |progress: ProgressUpdate| {
        reporter.update_from(progress);
    }
}
