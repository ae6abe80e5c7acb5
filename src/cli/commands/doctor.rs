//! Doctor command implementation.
//!
//! The `gifstudio-setup doctor` command reports what GIF Studio needs and
//! whether it is installed. Exits 1 when anything is missing.

use std::path::Path;

use crate::cli::args::DoctorArgs;
use crate::config::SetupConfig;
use crate::environment::EnvironmentContext;
use crate::error::{Result, SetupError};
use crate::provision::{diagnose, ProvisionContext, SystemServices};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The doctor command implementation.
pub struct DoctorCommand {
    source: ConfigSource,
    args: DoctorArgs,
}

impl DoctorCommand {
    /// Create a new doctor command.
    pub fn new(source: ConfigSource, args: DoctorArgs) -> Self {
        Self { source, args }
    }

    /// Run against explicit collaborators.
    pub fn run_with(
        &self,
        config: &SetupConfig,
        ctx: &ProvisionContext<'_>,
        env: &EnvironmentContext,
        working_dir: &Path,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let report = diagnose(ctx, env, config, working_dir);

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&report).map_err(|e| SetupError::Other(e.into()))?;
            ui.message(&json);
        } else {
            report.render(&config.interpreter.command, ui);
        }

        if report.is_healthy() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

impl Command for DoctorCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.source.load()?;
        let services = SystemServices::new(&config, false)?;
        let env = EnvironmentContext::from_process();
        self.run_with(
            &config,
            &services.context(),
            &env,
            self.source.working_dir(),
            ui,
        )
    }
}
