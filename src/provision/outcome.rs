//! Per-invocation outcomes.

use serde::Serialize;

use crate::environment::EnvironmentContext;
use crate::error::{Result, SetupError};
use crate::shell::{CommandResult, CommandRunner, CommandSpec};

/// What happened when a step ran its program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Exited with status 0.
    Success,
    /// Exited non-zero, or could not be started (`code` is `None`).
    Failed { code: Option<i32> },
    /// The program could not be located.
    NotFound,
    /// Nothing to run.
    Skipped,
}

impl StepOutcome {
    /// Classify a finished (or failed-to-start) invocation.
    pub fn from_run(result: &Result<CommandResult>) -> Self {
        match result {
            Ok(r) if r.success => Self::Success,
            Ok(r) => Self::Failed { code: r.exit_code },
            Err(SetupError::ProgramNotFound { .. }) => Self::NotFound,
            Err(_) => Self::Failed { code: None },
        }
    }

    /// Whether the step succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            Self::Success => "succeeded".to_string(),
            Self::Failed { code: Some(code) } => format!("failed with exit code {}", code),
            Self::Failed { code: None } => "failed to start".to_string(),
            Self::NotFound => "program not found".to_string(),
            Self::Skipped => "skipped".to_string(),
        }
    }
}

/// A named step, the command it ran and how it ended.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Step name.
    pub name: String,
    /// Command line as displayed to the user.
    pub command: String,
    /// How the step ended.
    pub outcome: StepOutcome,
    /// Captured output, or the error that prevented the run.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub output: String,
}

impl StepReport {
    /// Run `spec` and record its outcome. Never fails.
    pub fn execute(
        name: &str,
        runner: &dyn CommandRunner,
        spec: &CommandSpec,
        env: &EnvironmentContext,
    ) -> Self {
        let result = runner.run(spec, env);
        let outcome = StepOutcome::from_run(&result);
        let output = match &result {
            Ok(r) => r.combined_output(),
            Err(e) => e.to_string(),
        };

        tracing::debug!("Step {} ({}): {}", name, spec, outcome.describe());

        Self {
            name: name.to_string(),
            command: spec.to_string(),
            outcome,
            output,
        }
    }

    /// A step that had nothing to run.
    pub fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            command: String::new(),
            outcome: StepOutcome::Skipped,
            output: String::new(),
        }
    }
}
