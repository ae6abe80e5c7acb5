//! Search-path handling for freshly provisioned tools.
//!
//! An unattended installer persists its directories to machine/user scope
//! but cannot touch the environment our process inherited. This module
//! models that gap explicitly:
//!
//! - [`SearchPath`] - ordered, de-duplicated directory list
//! - [`EnvironmentSource`] - where persisted values are read from
//! - [`EnvironmentContext`] - the environment handed to child processes,
//!   refreshed from a source between steps

pub mod context;
pub mod search_path;
pub mod source;

pub use context::{parse_path_ext, EnvironmentContext};
pub use search_path::{is_runnable, SearchPath, SEPARATOR};
pub use source::{
    default_source, expand_env_vars, parse_reg_query, EnvironmentSource, ProcessEnvironment,
    RegistryEnvironment, StaticEnvironment, MACHINE_ENV_KEY, USER_ENV_KEY,
};
