//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::theme::Mark;
use super::{
    confirm_on, should_use_colors, NonInteractiveUI, OutputMode, ProgressSpinner, Prompt,
    SpinnerHandle, StudioTheme, UserInterface,
};

/// Interactive terminal UI.
///
/// Status goes to stdout; warnings and errors go to stderr so JSON output
/// stays parseable when piped.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: StudioTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            StudioTheme::new()
        } else {
            StudioTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }

    fn status(&mut self, line: String) {
        self.out.write_line(&line).ok();
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.status(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        let line = self.theme.status(Mark::Success, msg);
        self.status(line);
    }

    fn warning(&mut self, msg: &str) {
        self.err.write_line(&self.theme.status(Mark::Warning, msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        self.err.write_line(&self.theme.status(Mark::Error, msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        let line = format!("\n{}\n", self.theme.banner(title));
        self.status(line);
    }

    fn show_hint(&mut self, hint: &str) {
        let line = format!("  {}", self.theme.hint.apply_to(hint));
        self.status(line);
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(ProgressSpinner::final_line_only(self.theme.clone()))
        }
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        confirm_on(prompt, &self.out)
    }

    fn pause(&mut self, message: &str) {
        write!(self.out, "{} ", self.theme.dim.apply_to(message)).ok();
        self.out.flush().ok();
        if let Err(e) = self.out.read_line() {
            tracing::debug!("Pause skipped: {}", e);
        }
    }

    fn is_interactive(&self) -> bool {
        self.out.is_term()
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
