//! All command implementation.
//!
//! Runs the interpreter installer, then the dependency installer, threading
//! one environment context so the refreshed search path reaches the second
//! flow. A fatal interpreter failure stops before the dependencies.

use crate::cli::args::AllArgs;
use crate::config::SetupConfig;
use crate::environment::EnvironmentContext;
use crate::error::Result;
use crate::provision::{ProvisionContext, SystemServices};
use crate::ui::UserInterface;

use super::deps::run_deps;
use super::dispatcher::{Command, CommandResult, ConfigSource};
use super::interpreter::run_interpreter;

/// The all command implementation.
pub struct AllCommand {
    source: ConfigSource,
    args: AllArgs,
}

impl AllCommand {
    /// Create a new all command.
    pub fn new(source: ConfigSource, args: AllArgs) -> Self {
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
        let result = run_interpreter(config, self.args.force, ctx, env, ui)?;
        if !result.success {
            return Ok(result);
        }
        run_deps(config, self.args.no_pause, ctx, env, ui);
        Ok(CommandResult::success())
    }
}

impl Command for AllCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.source.load()?;
        let services = SystemServices::new(&config, ui.output_mode().shows_command_output())?;
        let mut env = EnvironmentContext::from_process();
        self.run_with(&config, &services.context(), &mut env, ui)
    }
}
