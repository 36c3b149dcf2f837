//! Spinner shown while the planner is thinking

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A spinner that clears itself when dropped
pub struct PlannerSpinner {
    bar: Option<ProgressBar>,
}

impl PlannerSpinner {
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {prefix:.bold.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_prefix("planner");
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    pub fn finish(mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for PlannerSpinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
