//! Dependency installer flow.
//!
//! Three independent install invocations (package batch, platform package,
//! media tool), then a search-path refresh and a media-tool version check.
//! No step gates another and the flow itself never fails.

use serde::Serialize;

use crate::config::DependencyConfig;
use crate::environment::EnvironmentContext;
use crate::shell::CommandSpec;
use crate::ui::UserInterface;

use super::context::ProvisionContext;
use super::outcome::{StepOutcome, StepReport};

/// Message shown while waiting for acknowledgement.
pub const PAUSE_MESSAGE: &str = "Press Enter to exit...";

/// Result of a dependency flow.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    /// Install steps, in order.
    pub steps: Vec<StepReport>,
    /// First line of the media tool's version output, if it ran.
    pub media_tool_version: Option<String>,
    /// Whether the flow waited for acknowledgement.
    pub paused: bool,
    /// Advisory, non-fatal problems.
    pub warnings: Vec<String>,
}

impl DependencyReport {
    /// Whether every install step succeeded (skipped steps count as success).
    pub fn all_succeeded(&self) -> bool {
        self.steps
            .iter()
            .all(|s| matches!(s.outcome, StepOutcome::Success | StepOutcome::Skipped))
    }

    fn warn(&mut self, ui: &mut dyn UserInterface, msg: String) {
        tracing::warn!("{}", msg);
        ui.warning(&msg);
        self.warnings.push(msg);
    }
}

/// Installs the packages and the media tool.
pub struct DependencyInstaller<'c> {
    config: &'c DependencyConfig,
    interpreter: &'c str,
    pause: bool,
}

impl<'c> DependencyInstaller<'c> {
    /// Create an installer that runs the package manager through `interpreter`.
    pub fn new(config: &'c DependencyConfig, interpreter: &'c str) -> Self {
        Self {
            config,
            interpreter,
            pause: true,
        }
    }

    /// Whether to wait for acknowledgement at the end.
    pub fn pause(mut self, pause: bool) -> Self {
        self.pause = pause;
        self
    }

    /// Run every step and report.
    pub fn run(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &mut EnvironmentContext,
        ui: &mut dyn UserInterface,
    ) -> DependencyReport {
        ui.show_header("Dependency Installer");

        let mut report = DependencyReport {
            steps: Vec::new(),
            media_tool_version: None,
            paused: false,
            warnings: Vec::new(),
        };

        let packages = self.pip_install(&self.config.packages);
        self.step(ctx, env, ui, &mut report, "packages", packages);

        let platform = self.pip_install(&self.config.platform_packages);
        self.step(ctx, env, ui, &mut report, "platform packages", platform);

        let media = CommandSpec::from_argv(&self.config.media_tool.install);
        self.step(ctx, env, ui, &mut report, &self.config.media_tool.name, media);

        if let Err(e) = env.refresh(ctx.env_source) {
            report.warn(ui, format!("Could not refresh the search path: {}", e));
        }

        let tool = &self.config.media_tool.name;
        let verify = CommandSpec::new(tool.as_str()).arg("-version");
        match ctx.runner.run(&verify, env) {
            Ok(result) if result.success => {
                let line = result.first_line().unwrap_or_default();
                ui.success(&format!("{} is available", tool));
                ui.message(&format!("  {}", line));
                report.media_tool_version = Some(line);
            }
            Ok(result) => report.warn(
                ui,
                format!("`{}` exited with {:?}", verify, result.exit_code),
            ),
            Err(_) => report.warn(
                ui,
                format!(
                    "{} was not found; open a new terminal session and check again",
                    tool
                ),
            ),
        }

        if report.all_succeeded() {
            ui.success("Dependency installer finished");
        } else {
            ui.message("Dependency installer finished; some steps need attention");
        }

        if self.pause {
            ui.pause(PAUSE_MESSAGE);
            report.paused = true;
        }

        report
    }

    fn pip_install(&self, packages: &[String]) -> Option<CommandSpec> {
        if packages.is_empty() {
            return None;
        }
        Some(
            CommandSpec::new(self.interpreter)
                .args(["-m", "pip", "install"])
                .args(packages),
        )
    }

    fn step(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &EnvironmentContext,
        ui: &mut dyn UserInterface,
        report: &mut DependencyReport,
        name: &str,
        spec: Option<CommandSpec>,
    ) {
        let Some(spec) = spec else {
            ui.message(&format!("No {} configured", name));
            report.steps.push(StepReport::skipped(name));
            return;
        };

        let mut spinner = ui.start_spinner(&format!("Installing {}", name));
        let step = StepReport::execute(name, ctx.runner, &spec, env);
        match &step.outcome {
            StepOutcome::Success => spinner.finish_success(&format!("Installed {}", name)),
            StepOutcome::NotFound => {
                spinner.finish_error(&format!("{}: {} not found", name, spec.program));
                ui.show_hint(&format!("Run: {}", spec));
            }
            other => {
                spinner.finish_error(&format!("{}: {}", name, other.describe()));
                ui.show_hint(&format!("Run: {}", spec));
            }
        }
        report.steps.push(step);
    }
}
