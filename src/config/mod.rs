//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, layering and env overrides in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use gifstudio_setup::config::{load_config_from, ConfigPaths};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join("gifstudio-setup.yml"),
//!     "interpreter:\n  version: '3.11.9'\n",
//! )
//! .unwrap();
//!
//! let paths = ConfigPaths::discover_with_home(temp.path(), None, None);
//! let config = load_config_from(&paths, |_| None).unwrap();
//! assert_eq!(config.interpreter.version, "3.11.9");
//! ```

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use loader::{
    apply_env_overrides, load_config, load_config_from, load_config_value, parse_config,
    ConfigPaths, PROJECT_CONFIG_FILE,
};
pub use merger::{deep_merge, merge_layers};
pub use schema::{
    default_modules, DependencyConfig, InterpreterConfig, MediaToolConfig, ModuleRequirement,
    SetupConfig, DEFAULT_PYTHON_VERSION,
};
pub use validator::{validate, validate_config, ValidationError};
