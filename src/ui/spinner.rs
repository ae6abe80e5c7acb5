//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::theme::{Mark, StudioTheme};
use super::SpinnerHandle;

/// A progress spinner for long-running operations.
pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: StudioTheme,
    print_final: bool,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str, theme: StudioTheme) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            theme,
            print_final: false,
        }
    }

    /// No animation; only the final status line is printed.
    pub fn final_line_only(theme: StudioTheme) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme,
            print_final: true,
        }
    }

    fn finish_with(&mut self, mark: Mark, msg: &str) {
        if self.print_final {
            println!("{}", self.theme.status(mark, msg));
            return;
        }
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(self.theme.status(mark, msg));
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish_with(Mark::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish_with(Mark::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish_with(Mark::Skipped, msg);
    }
}
