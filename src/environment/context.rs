//! Explicit environment threaded through provisioning steps.

use std::path::PathBuf;
use std::process::Command;

use crate::error::Result;

use super::search_path::SearchPath;
use super::source::EnvironmentSource;

/// The search path handed to every spawned child process.
///
/// Nothing here touches the real process environment: a refresh only
/// changes what later children see.
///
/// # Example
///
/// ```
/// use gifstudio_setup::environment::{EnvironmentContext, SearchPath, StaticEnvironment};
///
/// let source = StaticEnvironment::new("/usr/bin", "/home/me/bin");
/// let mut ctx = EnvironmentContext::with_search_path(SearchPath::new());
///
/// // An installer persisted a new directory.
/// source.set_machine_path("/opt/python312");
/// ctx.refresh(&source).unwrap();
///
/// assert!(ctx.search_path().contains("/opt/python312"));
/// assert!(ctx.search_path().contains("/home/me/bin"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvironmentContext {
    search_path: SearchPath,
    extensions: Vec<String>,
}

impl EnvironmentContext {
    /// Snapshot the current process search path (and PATHEXT on Windows).
    pub fn from_process() -> Self {
        let extensions = if cfg!(windows) {
            parse_path_ext(&std::env::var("PATHEXT").unwrap_or_default())
        } else {
            Vec::new()
        };

        Self {
            search_path: SearchPath::from_process(),
            extensions,
        }
    }

    /// Start from an explicit search path.
    pub fn with_search_path(search_path: SearchPath) -> Self {
        Self {
            search_path,
            ..Default::default()
        }
    }

    /// The current search path.
    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    /// Replace the search path.
    pub fn set_search_path(&mut self, search_path: SearchPath) {
        self.search_path = search_path;
    }

    /// Executable extensions.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Recompose machine- and user-scope search paths from `source`.
    ///
    /// Machine entries come first, user entries after, duplicates dropped.
    /// An empty result leaves the current search path untouched.
    pub fn refresh(&mut self, source: &dyn EnvironmentSource) -> Result<&SearchPath> {
        let machine = SearchPath::parse(&source.machine_path()?.unwrap_or_default());
        let user = SearchPath::parse(&source.user_path()?.unwrap_or_default());
        let merged = machine.merged(&user);

        if merged.is_empty() {
            tracing::warn!("Persisted search path is empty; keeping the current one");
        } else {
            tracing::debug!(
                "Search path refreshed: {} machine + {} user entries",
                machine.len(),
                user.len()
            );
            self.search_path = merged;
        }

        Ok(&self.search_path)
    }

    /// Locate a program on this context's search path.
    pub fn which(&self, program: &str) -> Option<PathBuf> {
        self.search_path.find_program(program, &self.extensions)
    }

    /// Apply this environment to a command about to be spawned.
    pub fn apply_to(&self, cmd: &mut Command) {
        cmd.env("PATH", self.search_path.to_string());
    }
}

/// Parse a PATHEXT value into lowercase extensions.
pub fn parse_path_ext(value: &str) -> Vec<String> {
    let exts: Vec<String> = value
        .split(';')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| e.starts_with('.'))
        .collect();

    if exts.is_empty() {
        vec![".exe".into(), ".cmd".into(), ".bat".into(), ".com".into()]
    } else {
        exts
    }
}
