//! CLI command implementations

pub mod clean;
pub mod context;
pub mod logging;
pub mod style;

use async_trait::async_trait;
use gh_reaper::confirm::Confirmer;
use gh_reaper::error::{Error, Result};
use gh_reaper::progress::ProgressCallback;
use gh_reaper::reap::DeletionOutcome;
use gh_reaper::types::PullRequestRecord;
use indicatif::{ProgressBar, ProgressDrawTarget};
use std::time::Duration;
use style::{bar_style, spinner_style};

/// Progress display backed by an indicatif bar
///
/// Turns into a bar once the total is known.
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Spinner with a message
    pub fn spinner(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Bar that stays hidden until the total is reported
    pub fn pending(message: &str) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_message(message.to_string());
        Self { bar }
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    async fn on_total(&self, total: u64) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.disable_steady_tick();
        self.bar.set_length(total);
        self.bar.set_style(bar_style());
    }

    async fn on_fetched(&self, _number: Option<u64>) {
        self.bar.inc(1);
    }

    async fn on_deleted(&self, _record: &PullRequestRecord, _outcome: &DeletionOutcome) {
        self.bar.inc(1);
    }
}

/// Interactive yes/no prompt
pub struct DialoguerConfirmer;

impl Confirmer for DialoguerConfirmer {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))
    }
}
