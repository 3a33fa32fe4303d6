//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;

/// Check mark used in summaries
pub const CHECK: &str = "✓";

/// Cross used in summaries
pub const CROSS: &str = "✗";

/// Semantic colours for CLI output
pub trait Stylize {
    /// Secondary, low-emphasis text
    fn muted(&self) -> String;
    /// Headings
    fn emphasis(&self) -> String;
    /// Names, numbers and other values
    fn accent(&self) -> String;
    /// Positive outcome
    fn success(&self) -> String;
    /// Something needs attention
    fn warn(&self) -> String;
    /// Failure
    fn error(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string()
    }

    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.bold())
            .to_string()
    }

    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string()
    }

    fn success(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.green())
            .to_string()
    }

    fn warn(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string()
    }

    fn error(&self) -> String {
        self.if_supports_color(Stream::Stderr, |t| t.red())
            .to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Red cross
pub fn cross() -> String {
    CROSS.error()
}

/// Style for indeterminate spinners
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "])
}

/// Style for bars with a known length
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} [{bar:30.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}
