//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::Result;

use super::theme::Mark;
use super::{parse_answer, OutputMode, Prompt, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts without a terminal.
pub const PROMPT_ENV_PREFIX: &str = "GIFSTUDIO_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `GIFSTUDIO_PROMPT_<KEY>` variables, falling
/// back to the prompt default. Pauses return immediately.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        println!("{}", Mark::Success.plain(msg));
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{}", Mark::Warning.plain(msg));
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", Mark::Error.plain(msg));
    }

    fn show_header(&mut self, title: &str) {
        println!("\n{}\n", title);
    }

    fn show_hint(&mut self, hint: &str) {
        println!("  {}", hint);
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(LineSpinner)
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        if let Some(answer) = self.env_overrides.get(&env_key).and_then(|v| parse_answer(v)) {
            tracing::debug!("Prompt '{}' answered from {}", prompt.key, env_key);
            return Ok(answer);
        }
        Ok(prompt.default)
    }

    fn pause(&mut self, _message: &str) {
        tracing::debug!("Skipping pause in non-interactive mode");
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner replacement that prints the final status as a plain line.
struct LineSpinner;

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        println!("{}", Mark::Success.plain(msg));
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", Mark::Error.plain(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        println!("{}", Mark::Skipped.plain(msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn confirm_uses_default_without_override() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Quiet, HashMap::new());
        let prompt = Prompt::new("reinstall_interpreter", "Reinstall?", false);
        assert!(!ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn confirm_reads_env_override() {
        let mut ui = NonInteractiveUI::with_overrides(
            OutputMode::Quiet,
            overrides(&[("GIFSTUDIO_PROMPT_REINSTALL_INTERPRETER", "yes")]),
        );
        let prompt = Prompt::new("reinstall_interpreter", "Reinstall?", false);
        assert!(ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn unparseable_override_falls_back_to_default() {
        let mut ui = NonInteractiveUI::with_overrides(
            OutputMode::Quiet,
            overrides(&[("GIFSTUDIO_PROMPT_REINSTALL_INTERPRETER", "perhaps")]),
        );
        let prompt = Prompt::new("reinstall_interpreter", "Reinstall?", true);
        assert!(ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn is_never_interactive() {
        let mut ui = NonInteractiveUI::new(OutputMode::Quiet);
        ui.pause("Press Enter");
        assert!(!ui.is_interactive());
    }
}
