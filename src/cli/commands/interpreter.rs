//! Interpreter command implementation.
//!
//! The `gifstudio-setup interpreter` command installs the pinned Python.

use crate::cli::args::InterpreterArgs;
use crate::config::SetupConfig;
use crate::environment::EnvironmentContext;
use crate::error::{Result, SetupError};
use crate::provision::{InstallStatus, InterpreterInstaller, ProvisionContext, SystemServices};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The interpreter command implementation.
pub struct InterpreterCommand {
    source: ConfigSource,
    args: InterpreterArgs,
}

impl InterpreterCommand {
    /// Create a new interpreter command.
    pub fn new(source: ConfigSource, args: InterpreterArgs) -> Self {
        Self { source, args }
    }

    /// Run against explicit collaborators.
    pub fn run_with(
        &self,
        config: &SetupConfig,
        ctx: &ProvisionContext<'_>,
        env: &mut EnvironmentContext,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        run_interpreter(config, self.args.force, ctx, env, ui)
    }
}

impl Command for InterpreterCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.source.load()?;
        let services = SystemServices::new(&config, ui.output_mode().shows_command_output())?;
        let mut env = EnvironmentContext::from_process();
        self.run_with(&config, &services.context(), &mut env, ui)
    }
}

/// Shared by `interpreter` and `all`: fatal provisioning errors become exit 1.
pub(super) fn run_interpreter(
    config: &SetupConfig,
    force: bool,
    ctx: &ProvisionContext<'_>,
    env: &mut EnvironmentContext,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    let installer = InterpreterInstaller::new(&config.interpreter).force(force);
    match installer.run(ctx, env, ui) {
        Ok(report) => {
            if report.status == InstallStatus::Installed && !report.warnings.is_empty() {
                ui.show_hint("Open a new terminal before running `gifstudio-setup deps`");
            }
            tracing::debug!("Interpreter report: {:?}", report);
            Ok(CommandResult::success())
        }
        Err(e) if e.is_fatal_provisioning() => {
            ui.error(&e.to_string());
            if matches!(e, SetupError::NotElevated) {
                ui.show_hint("Right-click your terminal and choose \"Run as administrator\"");
            }
            Ok(CommandResult::failure(1))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::StaticEnvironment;
    use crate::provision::FakeDownloader;
    use crate::shell::ScriptedRunner;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn command() -> InterpreterCommand {
        let temp = TempDir::new().unwrap();
        InterpreterCommand::new(
            ConfigSource::new(temp.path(), None),
            InterpreterArgs::default(),
        )
    }

    #[test]
    fn not_elevated_exits_one_without_download() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let downloader = FakeDownloader::serving(b"installer".to_vec());
        let source = StaticEnvironment::empty();
        let is_elevated = || false;
        let ctx = ProvisionContext {
            runner: &runner,
            downloader: &downloader,
            env_source: &source,
            is_elevated: &is_elevated,
            temp_dir: temp.path().to_path_buf(),
        };
        let mut ui = MockUI::new();

        let result = command()
            .run_with(
                &SetupConfig::default(),
                &ctx,
                &mut EnvironmentContext::default(),
                &mut ui,
            )
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(downloader.requests().is_empty());
        assert!(ui.has_error("Administrator privileges are required"));
        assert!(ui.has_hint("Run as administrator"));
    }

    #[test]
    fn download_failure_exits_one_without_install() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let downloader = FakeDownloader::failing("connection refused");
        let source = StaticEnvironment::empty();
        let is_elevated = || true;
        let ctx = ProvisionContext {
            runner: &runner,
            downloader: &downloader,
            env_source: &source,
            is_elevated: &is_elevated,
            temp_dir: temp.path().to_path_buf(),
        };
        let mut ui = MockUI::new();

        let result = command()
            .run_with(
                &SetupConfig::default(),
                &ctx,
                &mut EnvironmentContext::default(),
                &mut ui,
            )
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(runner.count_matching(|s| s.args.iter().any(|a| a == "/quiet")), 0);
        assert!(ui.has_error("connection refused"));
    }
}
