//! Configuration validation rules.
//!
//! - The interpreter version must be `X.Y.Z`
//! - The installer URL must use HTTPS
//! - A configured SHA-256 must be 64 hex characters
//! - The interpreter command and installer arguments must not be empty
//! - The package batch must not be empty
//! - The media tool needs a name and an install command

use crate::config::schema::SetupConfig;
use crate::error::{Result, SetupError};
use regex::Regex;

/// Validation error with the offending field.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Dotted path of the field (e.g. "interpreter.version")
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return every error found.
pub fn validate_config(config: &SetupConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let interp = &config.interpreter;

    let version_re = Regex::new(r"^\d+\.\d+\.\d+$").expect("static regex");
    if !version_re.is_match(&interp.version) {
        errors.push(ValidationError::new(
            "interpreter.version",
            format!(
                "interpreter.version '{}' must look like X.Y.Z",
                interp.version
            ),
        ));
    }

    let url = interp.installer_url();
    if !url.starts_with("https://") {
        errors.push(ValidationError::new(
            "interpreter.installer_url",
            format!("interpreter.installer_url '{}' must use https://", url),
        ));
    }

    if let Some(sha) = &interp.sha256 {
        if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
            errors.push(ValidationError::new(
                "interpreter.sha256",
                "interpreter.sha256 must be 64 hexadecimal characters",
            ));
        }
    }

    if interp.command.trim().is_empty() {
        errors.push(ValidationError::new(
            "interpreter.command",
            "interpreter.command must not be empty",
        ));
    }

    if interp.installer_args.is_empty() {
        errors.push(ValidationError::new(
            "interpreter.installer_args",
            "interpreter.installer_args must not be empty (the install would prompt)",
        ));
    }

    if config.dependencies.packages.is_empty() {
        errors.push(ValidationError::new(
            "dependencies.packages",
            "dependencies.packages must list at least one package",
        ));
    }

    let tool = &config.dependencies.media_tool;
    if tool.name.trim().is_empty() {
        errors.push(ValidationError::new(
            "dependencies.media_tool.name",
            "dependencies.media_tool.name must not be empty",
        ));
    }
    if tool.install.is_empty() {
        errors.push(ValidationError::new(
            "dependencies.media_tool.install",
            "dependencies.media_tool.install must name a program",
        ));
    }

    errors
}

/// Validate a configuration, joining all errors into one.
pub fn validate(config: &SetupConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(SetupError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
