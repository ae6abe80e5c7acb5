//! Provisioning flows.
//!
//! - [`InterpreterInstaller`] installs the pinned interpreter
//! - [`DependencyInstaller`] installs packages and the media tool
//! - [`diagnose`] reports what is available without changing anything
//!
//! Flows share a [`ProvisionContext`] for their collaborators and thread one
//! [`EnvironmentContext`](crate::environment::EnvironmentContext) so a
//! refreshed search path reaches later steps.

pub mod artifact;
pub mod context;
pub mod dependencies;
pub mod doctor;
pub mod download;
pub mod interpreter;
pub mod media_tool;
pub mod modules;
pub mod outcome;
pub mod probe;

pub use artifact::InstallerArtifact;
pub use context::{ProvisionContext, SystemServices};
pub use dependencies::{DependencyInstaller, DependencyReport, PAUSE_MESSAGE};
pub use doctor::{diagnose, diagnose_in, DoctorReport};
pub use download::{Downloader, FakeDownloader, HttpDownloader};
pub use interpreter::{
    InstallStatus, InterpreterInstaller, InterpreterReport, PackageManagerStatus,
    REINSTALL_PROMPT_KEY,
};
pub use media_tool::MediaToolInfo;
pub use modules::ModuleStatus;
pub use outcome::{StepOutcome, StepReport};
pub use probe::InterpreterInfo;
