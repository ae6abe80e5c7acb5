//! gifstudio-setup - cold-start provisioning for GIF Studio.
//!
//! Installs a pinned Python interpreter on a fresh Windows machine, then the
//! Python packages and the ffmpeg binary the GIF Studio utility needs.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`environment`] - Search path handling and persisted environment sources
//! - [`error`] - Error types and result aliases
//! - [`provision`] - Interpreter installer, dependency installer and doctor
//! - [`shell`] - Program execution
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use gifstudio_setup::environment::{EnvironmentContext, SearchPath, StaticEnvironment};
//!
//! // A freshly installed interpreter directory shows up after a refresh.
//! let source = StaticEnvironment::new("/opt/python", "");
//! let mut env = EnvironmentContext::with_search_path(SearchPath::parse("/usr/bin"));
//! env.refresh(&source).unwrap();
//! assert!(env.search_path().contains("/opt/python"));
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod provision;
pub mod shell;
pub mod ui;

pub use error::{Result, SetupError};
