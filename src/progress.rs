//! Terminal progress bar for long analyses
//!
//! Draws to stderr and hides itself when stderr is not a terminal, so JSON
//! output on stdout stays clean.

use cartograph::{AnalysisStage, ProgressSink};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30.cyan/blue}] {pos:>3}% {msg}") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }
}

impl ProgressSink for TerminalProgress {
    fn report(&self, _repo_id: &str, stage: AnalysisStage, detail: &str) {
        self.bar.set_position(u64::from(stage.percent()));
        if detail.is_empty() {
            self.bar.set_message(stage.to_string());
        } else {
            self.bar.set_message(format!("{}: {}", stage, detail));
        }
        if matches!(stage, AnalysisStage::Complete | AnalysisStage::Failed) {
            self.bar.finish_and_clear();
        }
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
