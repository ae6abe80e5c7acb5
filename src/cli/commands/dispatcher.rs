//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{AllArgs, Cli, Commands};
use crate::config::{load_config, SetupConfig};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Where a command finds its configuration.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    working_dir: PathBuf,
    explicit: Option<PathBuf>,
}

impl ConfigSource {
    /// Discover config from `working_dir`, plus an optional explicit file.
    pub fn new(working_dir: &Path, explicit: Option<&Path>) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            explicit: explicit.map(Path::to_path_buf),
        }
    }

    /// Working directory the command runs in.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Load, merge and validate.
    pub fn load(&self) -> Result<SetupConfig> {
        load_config(&self.working_dir, self.explicit.as_deref())
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    source: ConfigSource,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given working directory.
    pub fn new(working_dir: PathBuf, explicit_config: Option<PathBuf>) -> Self {
        Self {
            source: ConfigSource::new(&working_dir, explicit_config.as_deref()),
        }
    }

    /// Get the working directory.
    pub fn working_dir(&self) -> &Path {
        self.source.working_dir()
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it. No subcommand runs `all`.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let source = self.source.clone();
        match &cli.command {
            Some(Commands::Interpreter(args)) => {
                super::interpreter::InterpreterCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::Deps(args)) => {
                super::deps::DepsCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::All(args)) => {
                super::all::AllCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::Doctor(args)) => {
                super::doctor::DoctorCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::Config(args)) => {
                super::config::ConfigCommand::new(source, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::all::AllCommand::new(source, AllArgs::default()).execute(ui),
        }
    }
}
