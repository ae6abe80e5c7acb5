//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// GIF Studio setup - installs Python, the Python packages and ffmpeg.
#[derive(Debug, Parser)]
#[command(name = "gifstudio-setup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to an extra config file (applied after the discovered ones)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output, including installer output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use defaults, no prompts and no pause
    #[arg(long, global = true)]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install the pinned Python interpreter (requires administrator)
    Interpreter(InterpreterArgs),

    /// Install the Python packages and ffmpeg
    Deps(DepsArgs),

    /// Install the interpreter, then the dependencies (default)
    All(AllArgs),

    /// Report what is installed without changing anything
    Doctor(DoctorArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `interpreter` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InterpreterArgs {
    /// Reinstall even if the pinned version is already present
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `deps` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DepsArgs {
    /// Exit without waiting for Enter
    #[arg(long)]
    pub no_pause: bool,
}

/// Arguments for the `all` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AllArgs {
    /// Reinstall the interpreter even if the pinned version is already present
    #[arg(short, long)]
    pub force: bool,

    /// Exit without waiting for Enter
    #[arg(long)]
    pub no_pause: bool,
}

/// Arguments for the `doctor` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the JSON schema of the config file instead
    #[arg(long, conflicts_with = "json")]
    pub schema: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
