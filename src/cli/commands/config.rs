//! Config command implementation.
//!
//! The `gifstudio-setup config` command shows the resolved configuration.

use crate::cli::args::ConfigArgs;
use crate::config::{ConfigPaths, SetupConfig};
use crate::error::{Result, SetupError};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The config command implementation.
pub struct ConfigCommand {
    source: ConfigSource,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(source: ConfigSource, args: ConfigArgs) -> Self {
        Self { source, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ConfigArgs {
        &self.args
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.schema {
            let schema = schemars::schema_for!(SetupConfig);
            let json =
                serde_json::to_string_pretty(&schema).map_err(|e| SetupError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        let config = self.source.load()?;

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&config).map_err(|e| SetupError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        // Show config file path(s)
        let paths = ConfigPaths::discover(self.source.working_dir(), None);
        let existing = paths.all();
        if existing.is_empty() {
            ui.message("# built-in defaults");
        }
        for path in &existing {
            ui.message(&format!("# {}", path.display()));
        }

        let yaml = serde_yaml::to_string(&config).map_err(|e| SetupError::Other(e.into()))?;
        ui.message(&yaml);

        Ok(CommandResult::success())
    }
}
