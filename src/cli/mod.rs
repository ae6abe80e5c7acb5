//! Command-line interface for gifstudio-setup.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    AllArgs, Cli, Commands, CompletionsArgs, ConfigArgs, DepsArgs, DoctorArgs, InterpreterArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult, ConfigSource};
