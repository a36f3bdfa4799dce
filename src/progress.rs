//! Progress bar for batch ladder computations
//!
//! Visual feedback while many pairs are computed, using the indicatif crate.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar advanced once per computed pair
pub struct BatchProgress {
    pub progress: ProgressBar,
}

impl BatchProgress {
    /// Create a new batch progress bar
    pub fn new(total_pairs: usize) -> Self {
        let progress = ProgressBar::new(total_pairs as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}\n{msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        Self { progress }
    }

    /// A bar that draws nothing, for JSON output and tests
    pub fn hidden(total_pairs: usize) -> Self {
        let progress = ProgressBar::with_draw_target(Some(total_pairs as u64), ProgressDrawTarget::hidden());
        Self { progress }
    }

    /// Record one finished pair
    pub fn pair_done(&self, symbol: &str, ok: bool) {
        self.progress.inc(1);
        let icon = if ok { "📊" } else { "❌" };
        self.progress.set_message(format!("{} {}", icon, symbol));
    }

    /// Mark the batch as complete
    pub fn finish(&self, succeeded: usize, failed: usize) {
        self.progress.finish_with_message(format!(
            "✅ Batch complete! {} ladder(s), {} failed",
            succeeded, failed
        ));
    }
}
