//! Interpreter installer flow.
//!
//! Elevation check, pinned installer download, unattended install,
//! search-path refresh, verification and package-manager bootstrap.
//! The downloaded installer never outlives the flow.

use serde::Serialize;

use crate::config::InterpreterConfig;
use crate::environment::EnvironmentContext;
use crate::error::{Result, SetupError};
use crate::shell::CommandSpec;
use crate::ui::{Prompt, UserInterface};

use super::artifact::InstallerArtifact;
use super::context::ProvisionContext;
use super::outcome::{StepOutcome, StepReport};
use super::probe::{probe_interpreter, probe_package_manager};

/// Prompt key for reinstalling an interpreter that is already present.
pub const REINSTALL_PROMPT_KEY: &str = "reinstall_interpreter";

/// Whether this run installed the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallStatus {
    /// The installer ran and succeeded.
    Installed,
    /// The pinned version was already present; nothing was downloaded.
    AlreadyInstalled,
}

/// State of the package manager after the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageManagerStatus {
    /// Present before bootstrapping.
    Present,
    /// Installed by `ensurepip`.
    Bootstrapped,
    /// Still unavailable.
    Missing,
}

/// Result of a completed interpreter flow.
#[derive(Debug, Clone, Serialize)]
pub struct InterpreterReport {
    /// Pinned version.
    pub version: String,
    /// Whether anything was installed.
    pub status: InstallStatus,
    /// Version reported after the flow, if the interpreter resolved.
    pub verified_version: Option<String>,
    /// Package manager state.
    pub package_manager: PackageManagerStatus,
    /// Search path after the refresh.
    pub search_path: Vec<String>,
    /// SHA-256 of the installer that ran, when one was downloaded.
    pub installer_sha256: Option<String>,
    /// Sub-process steps, in order.
    pub steps: Vec<StepReport>,
    /// Advisory, non-fatal problems.
    pub warnings: Vec<String>,
}

impl InterpreterReport {
    fn new(version: &str, status: InstallStatus) -> Self {
        Self {
            version: version.to_string(),
            status,
            verified_version: None,
            package_manager: PackageManagerStatus::Missing,
            search_path: Vec::new(),
            installer_sha256: None,
            steps: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, ui: &mut dyn UserInterface, msg: String) {
        tracing::warn!("{}", msg);
        ui.warning(&msg);
        self.warnings.push(msg);
    }
}

/// Installs the pinned interpreter.
pub struct InterpreterInstaller<'c> {
    config: &'c InterpreterConfig,
    force: bool,
}

impl<'c> InterpreterInstaller<'c> {
    /// Create an installer for `config`.
    pub fn new(config: &'c InterpreterConfig) -> Self {
        Self {
            config,
            force: false,
        }
    }

    /// Reinstall even when the pinned version is already present.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Run the flow, updating `env` in place.
    ///
    /// Missing elevation, a failed download and a failed install are
    /// errors; verification and bootstrap problems become warnings.
    pub fn run(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &mut EnvironmentContext,
        ui: &mut dyn UserInterface,
    ) -> Result<InterpreterReport> {
        let config = self.config;
        ui.show_header(&format!("Interpreter Installer (Python {})", config.version));

        if !(ctx.is_elevated)() {
            return Err(SetupError::NotElevated);
        }

        // The caller's path may predate an earlier install.
        if let Err(e) = env.refresh(ctx.env_source) {
            tracing::warn!("Could not refresh the search path, keeping the current one: {}", e);
        }

        let mut report = if self.should_install(ctx, env, ui)? {
            self.install(ctx, env, ui)?
        } else {
            let mut report = InterpreterReport::new(&config.version, InstallStatus::AlreadyInstalled);
            report.search_path = env.search_path().entries().to_vec();
            report
        };

        match probe_interpreter(ctx.runner, env, &config.command) {
            Some(info) => {
                ui.success(&format!("Python {} is available", info.version));
                if info.version != config.version {
                    report.warn(
                        ui,
                        format!(
                            "{} reports {} but {} was installed; another interpreter may come first on the search path",
                            config.command, info.version, config.version
                        ),
                    );
                }
                report.verified_version = Some(info.version);
            }
            None => report.warn(
                ui,
                format!(
                    "Could not run `{} --version`; a new terminal session may be needed",
                    config.command
                ),
            ),
        }

        self.bootstrap_package_manager(ctx, env, ui, &mut report);

        if report.warnings.is_empty() {
            ui.success("Interpreter installer finished");
        } else {
            ui.message(&format!(
                "Interpreter installer finished with {} warning(s)",
                report.warnings.len()
            ));
        }

        Ok(report)
    }

    fn should_install(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &EnvironmentContext,
        ui: &mut dyn UserInterface,
    ) -> Result<bool> {
        if self.force {
            return Ok(true);
        }

        let Some(existing) = probe_interpreter(ctx.runner, env, &self.config.command) else {
            return Ok(true);
        };
        if existing.version != self.config.version {
            tracing::info!(
                "Found Python {}, installing {}",
                existing.version,
                self.config.version
            );
            return Ok(true);
        }

        let prompt = Prompt::new(
            REINSTALL_PROMPT_KEY,
            format!("Python {} is already installed. Reinstall?", existing.version),
            false,
        );
        if ui.confirm(&prompt)? {
            return Ok(true);
        }

        ui.success(&format!("Python {} is already installed", existing.version));
        Ok(false)
    }

    fn install(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &mut EnvironmentContext,
        ui: &mut dyn UserInterface,
    ) -> Result<InterpreterReport> {
        let config = self.config;
        let url = config.installer_url();
        let mut report = InterpreterReport::new(&config.version, InstallStatus::Installed);

        let mut spinner = ui.start_spinner(&format!("Downloading {}", url));
        let artifact = match InstallerArtifact::download(
            ctx.downloader,
            &url,
            &ctx.temp_dir,
            &config.installer_file_name(),
            config.sha256.as_deref(),
        ) {
            Ok(artifact) => {
                spinner.finish_success(&format!(
                    "Downloaded {} ({} bytes)",
                    config.installer_file_name(),
                    artifact.size()
                ));
                tracing::info!(sha256 = artifact.sha256(), "Installer downloaded");
                report.installer_sha256 = Some(artifact.sha256().to_string());
                artifact
            }
            Err(e) => {
                spinner.finish_error("Download failed");
                return Err(e);
            }
        };

        let spec = CommandSpec::new(artifact.path().to_string_lossy()).args(&config.installer_args);
        let mut spinner = ui.start_spinner("Running unattended install (this can take a few minutes)");
        let step = StepReport::execute("install", ctx.runner, &spec, env);

        if let Err(e) = artifact.cleanup() {
            report.warn(ui, format!("Could not remove the downloaded installer: {}", e));
        }

        match step.outcome {
            StepOutcome::Success => spinner.finish_success(&format!("Installed Python {}", config.version)),
            StepOutcome::Failed { code } => {
                spinner.finish_error(&format!("Installer {}", step.outcome.describe()));
                ui.message("Completed before the failure: elevation check, download");
                return Err(SetupError::InstallFailed { code });
            }
            StepOutcome::NotFound | StepOutcome::Skipped => {
                spinner.finish_error("Installer could not be started");
                ui.message("Completed before the failure: elevation check, download");
                return Err(SetupError::InstallFailed { code: None });
            }
        }
        report.steps.push(step);

        match env.refresh(ctx.env_source) {
            Ok(path) => {
                report.search_path = path.entries().to_vec();
                ui.success("Search path refreshed from machine and user settings");
            }
            Err(e) => report.warn(ui, format!("Could not refresh the search path: {}", e)),
        }

        Ok(report)
    }

    fn bootstrap_package_manager(
        &self,
        ctx: &ProvisionContext<'_>,
        env: &EnvironmentContext,
        ui: &mut dyn UserInterface,
        report: &mut InterpreterReport,
    ) {
        let python = &self.config.command;
        if report.verified_version.is_none() && ctx.runner.resolve(python, env).is_none() {
            report.warn(
                ui,
                "Skipping package manager setup because the interpreter was not found".to_string(),
            );
            return;
        }

        let present = probe_package_manager(ctx.runner, env, python).is_some();
        let mut bootstrapped = false;
        if !present {
            let spec = CommandSpec::new(python.as_str()).args(["-m", "ensurepip", "--upgrade"]);
            let step = StepReport::execute("ensurepip", ctx.runner, &spec, env);
            if step.outcome.is_success() {
                bootstrapped = true;
            } else {
                report.warn(ui, format!("ensurepip {}", step.outcome.describe()));
            }
            report.steps.push(step);
        }

        let spec = CommandSpec::new(python.as_str()).args(["-m", "pip", "install", "--upgrade", "pip"]);
        let mut spinner = ui.start_spinner("Upgrading pip");
        let step = StepReport::execute("upgrade pip", ctx.runner, &spec, env);
        if step.outcome.is_success() {
            spinner.finish_success("pip is up to date");
        } else {
            spinner.finish_error("pip upgrade failed");
            report.warn(ui, format!("pip upgrade {}", step.outcome.describe()));
        }
        let upgraded = step.outcome.is_success();
        report.steps.push(step);

        report.package_manager = if present {
            PackageManagerStatus::Present
        } else if bootstrapped || upgraded {
            PackageManagerStatus::Bootstrapped
        } else {
            PackageManagerStatus::Missing
        };
    }
}
