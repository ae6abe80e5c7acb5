//! Error types for provisioning operations.
//!
//! This module defines [`SetupError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Fatal provisioning conditions (missing elevation, failed download,
//!   failed unattended install) are distinct variants so the CLI can map
//!   them to exit codes
//! - Degraded conditions never become errors; they are collected as
//!   warnings on the step reports
//! - Use `anyhow::Error` (via `SetupError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for provisioning operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The process lacks administrator privileges.
    #[error("Administrator privileges are required. Re-run from an elevated prompt.")]
    NotElevated,

    /// Fetching the installer failed.
    #[error("Failed to download {url}: {message}")]
    DownloadFailed { url: String, message: String },

    /// The downloaded installer does not match the pinned checksum.
    #[error("Checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    /// The unattended installer exited unsuccessfully.
    #[error("Unattended install failed with exit code {code:?}")]
    InstallFailed { code: Option<i32> },

    /// A program could not be spawned because it does not exist.
    #[error("Program not found: {program}")]
    ProgramNotFound { program: String },

    /// A program could not be spawned or waited on.
    #[error("Command failed to start: {command}: {message}")]
    CommandFailed { command: String, message: String },

    /// Configuration file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SetupError {
    /// Whether this error ends a provisioning flow with a non-zero exit.
    pub fn is_fatal_provisioning(&self) -> bool {
        matches!(
            self,
            SetupError::NotElevated
                | SetupError::DownloadFailed { .. }
                | SetupError::ChecksumMismatch { .. }
                | SetupError::InstallFailed { .. }
        )
    }
}

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, SetupError>;
