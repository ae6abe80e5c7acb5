//! Deps command implementation.
//!
//! The `gifstudio-setup deps` command installs the packages and ffmpeg.
//! It always exits 0; problems are reported along the way.

use crate::cli::args::DepsArgs;
use crate::config::SetupConfig;
use crate::environment::EnvironmentContext;
use crate::error::Result;
use crate::provision::{DependencyInstaller, DependencyReport, ProvisionContext, SystemServices};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The deps command implementation.
pub struct DepsCommand {
    source: ConfigSource,
    args: DepsArgs,
}

impl DepsCommand {
    /// Create a new deps command.
    pub fn new(source: ConfigSource, args: DepsArgs) -> Self {
        Self { source, args }
    }

    /// Run against explicit collaborators.
    pub fn run_with(
        &self,
        config: &SetupConfig,
        ctx: &ProvisionContext<'_>,
        env: &mut EnvironmentContext,
        ui: &mut dyn UserInterface,
    ) -> CommandResult {
        run_deps(config, self.args.no_pause, ctx, env, ui);
        CommandResult::success()
    }
}

impl Command for DepsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.source.load()?;
        let services = SystemServices::new(&config, ui.output_mode().shows_command_output())?;
        let mut env = EnvironmentContext::from_process();
        Ok(self.run_with(&config, &services.context(), &mut env, ui))
    }
}

/// Shared by `deps` and `all`.
pub(super) fn run_deps(
    config: &SetupConfig,
    no_pause: bool,
    ctx: &ProvisionContext<'_>,
    env: &mut EnvironmentContext,
    ui: &mut dyn UserInterface,
) -> DependencyReport {
    let pause = !no_pause && ui.is_interactive();
    let report = DependencyInstaller::new(&config.dependencies, &config.interpreter.command)
        .pause(pause)
        .run(ctx, env, ui);
    tracing::debug!("Dependency report: {:?}", report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::StaticEnvironment;
    use crate::provision::FakeDownloader;
    use crate::shell::ScriptedRunner;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn run(runner: &ScriptedRunner, args: DepsArgs, ui: &mut MockUI) -> CommandResult {
        let temp = TempDir::new().unwrap();
        let downloader = FakeDownloader::failing("unused");
        let source = StaticEnvironment::empty();
        let is_elevated = || false;
        let ctx = ProvisionContext {
            runner,
            downloader: &downloader,
            env_source: &source,
            is_elevated: &is_elevated,
            temp_dir: temp.path().to_path_buf(),
        };
        DepsCommand::new(ConfigSource::new(temp.path(), None), args).run_with(
            &SetupConfig::default(),
            &ctx,
            &mut EnvironmentContext::default(),
            ui,
        )
    }

    #[test]
    fn exits_zero_when_everything_fails() {
        let runner = ScriptedRunner::new();
        let mut ui = MockUI::new();

        let result = run(&runner, DepsArgs::default(), &mut ui);

        assert_eq!(result.exit_code, 0);
        assert_eq!(runner.calls().len(), 4);
    }

    #[test]
    fn pauses_only_when_interactive() {
        let runner = ScriptedRunner::new();
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        run(&runner, DepsArgs::default(), &mut ui);
        assert_eq!(ui.pauses().len(), 1);

        let mut ui = MockUI::new();
        run(&runner, DepsArgs::default(), &mut ui);
        assert!(ui.pauses().is_empty());
    }

    #[test]
    fn no_pause_flag_skips_pause() {
        let runner = ScriptedRunner::new();
        let mut ui = MockUI::new();
        ui.set_interactive(true);

        run(&runner, DepsArgs { no_pause: true }, &mut ui);

        assert!(ui.pauses().is_empty());
    }
}
