//! Progress reporting for CLI
//!
//! Wraps an [`indicatif::ProgressBar`] behind the `FnMut(f32) -> bool`
//! callback contract shared by the scanner and the use cases: the bar is
//! driven by a percentage in `[0, 100]`, and the callback always returns
//! `true` (the CLI never cancels a run early).

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

pub struct ProgressReporter {
    bar: Arc<ProgressBar>,
}

impl ProgressReporter {
    fn new(message: &str) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent}% ({eta})")
                .unwrap()
                .progress_chars("#>-"),
        );
        bar.set_message(message.to_string());

        Self { bar: Arc::new(bar) }
    }

    /// Creates a progress reporter for an analysis run.
    pub fn for_analysis() -> Self {
        Self::new("Analyzing source...")
    }

    /// Creates a progress reporter for a recovery run.
    pub fn for_recovery() -> Self {
        Self::new("Recovering files...")
    }

    /// Returns a callback matching the `FnMut(f32) -> bool` progress
    /// contract, driving the bar as a percentage.
    pub fn callback(&self) -> Box<dyn FnMut(f32) -> bool + Send> {
        let bar = Arc::clone(&self.bar);
        Box::new(move |percent: f32| {
            bar.set_position(percent.round() as u64);
            true
        })
    }

    /// Returns a callback for recovery progress, `(completed, total)`.
    pub fn recovery_callback(&self) -> Box<dyn FnMut(usize, usize) + Send> {
        let bar = Arc::clone(&self.bar);
        Box::new(move |completed: usize, total: usize| {
            bar.set_length(total as u64);
            bar.set_position(completed as u64);
        })
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}
