//! Progress tracking for thumbnail batches

use std::sync::atomic::{AtomicUsize, Ordering};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Thread-safe progress counters, optionally mirrored to a terminal progress bar
pub struct ProgressTracker {
    total: usize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    artifacts_written: AtomicUsize,
    bar: Option<ProgressBar>,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub artifacts_written: usize,
}

impl ProgressTracker {
    /// Counters only
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            artifacts_written: AtomicUsize::new(0),
            bar: None,
        }
    }

    /// Counters plus a progress bar drawn on stderr
    pub fn with_progress_bar(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec}, {eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);

        Self {
            bar: Some(bar),
            ..Self::new(total)
        }
    }

    /// Record that `image` finished, successfully or not
    pub fn complete_item(&self, image: &str, success: bool) {
        if success {
            self.completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }

        if let Some(bar) = &self.bar {
            bar.set_message(image.to_string());
            bar.inc(1);
        }

        debug!("Finished {} (success: {})", image, success);
    }

    pub fn record_artifacts(&self, count: usize) {
        self.artifacts_written.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressState {
        ProgressState {
            total: self.total,
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            artifacts_written: self.artifacts_written.load(Ordering::Relaxed),
        }
    }

    /// Close the progress bar, if any
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message("done");
        }
    }
}
