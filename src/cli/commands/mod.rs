//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Provisioning commands expose a
//! `run_with` that takes explicit collaborators, so they can run against
//! fakes.

pub mod all;
pub mod completions;
pub mod config;
pub mod deps;
pub mod dispatcher;
pub mod doctor;
pub mod interpreter;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, ConfigSource};
