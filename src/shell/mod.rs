//! Program execution and platform checks.

pub mod command;
pub mod platform;
pub mod scripted;

pub use command::{
    execute_streaming, CommandResult, CommandRunner, CommandSpec, OutputCallback, OutputLine,
    SystemRunner,
};
pub use platform::{is_ci, is_elevated};
pub use scripted::ScriptedRunner;
