//! Sources of the persisted machine- and user-scope search paths.
//!
//! On Windows the persisted values live in the registry; an unattended
//! installer updates them but not the environment our process inherited.

use std::sync::Mutex;

use regex::Regex;

use crate::error::Result;
use crate::shell::{CommandRunner, CommandSpec, SystemRunner};

use super::context::EnvironmentContext;

/// Registry key holding the machine-scope environment.
pub const MACHINE_ENV_KEY: &str =
    r"HKLM\SYSTEM\CurrentControlSet\Control\Session Manager\Environment";
/// Registry key holding the user-scope environment.
pub const USER_ENV_KEY: &str = r"HKCU\Environment";

/// Where persisted search-path values are read from.
pub trait EnvironmentSource {
    /// Machine-scope search path, if set.
    fn machine_path(&self) -> Result<Option<String>>;

    /// User-scope search path, if set.
    fn user_path(&self) -> Result<Option<String>>;
}

/// Reads `Path` from the Windows registry through `reg query`.
pub struct RegistryEnvironment<R: CommandRunner = SystemRunner> {
    runner: R,
}

impl RegistryEnvironment<SystemRunner> {
    /// Create a source backed by the real `reg` tool.
    pub fn new() -> Self {
        Self {
            runner: SystemRunner::quiet(),
        }
    }
}

impl Default for RegistryEnvironment<SystemRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> RegistryEnvironment<R> {
    /// Create a source that runs `reg` through `runner`.
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    fn query(&self, key: &str) -> Result<Option<String>> {
        let spec = CommandSpec::new("reg").args(["query", key, "/v", "Path"]);
        let result = self
            .runner
            .run(&spec, &EnvironmentContext::from_process())?;

        // A missing value makes `reg` exit non-zero.
        if !result.success {
            tracing::debug!("No Path value under {}", key);
            return Ok(None);
        }

        Ok(parse_reg_query(&result.stdout, "Path").map(|(kind, value)| {
            if kind == "REG_EXPAND_SZ" {
                expand_env_vars(&value, |name| std::env::var(name).ok())
            } else {
                value
            }
        }))
    }
}

impl<R: CommandRunner> EnvironmentSource for RegistryEnvironment<R> {
    fn machine_path(&self) -> Result<Option<String>> {
        self.query(MACHINE_ENV_KEY)
    }

    fn user_path(&self) -> Result<Option<String>> {
        self.query(USER_ENV_KEY)
    }
}

/// Uses the inherited `PATH` as machine scope (platforms without a registry).
#[derive(Debug, Default)]
pub struct ProcessEnvironment;

impl EnvironmentSource for ProcessEnvironment {
    fn machine_path(&self) -> Result<Option<String>> {
        Ok(std::env::var("PATH").ok())
    }

    fn user_path(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// In-memory source whose values can change while a flow runs.
///
/// Lets a simulated installer "persist" a new directory that a later
/// refresh picks up.
#[derive(Debug, Default)]
pub struct StaticEnvironment {
    machine: Mutex<Option<String>>,
    user: Mutex<Option<String>>,
}

impl StaticEnvironment {
    /// Create a source with both scopes set.
    pub fn new(machine: &str, user: &str) -> Self {
        Self {
            machine: Mutex::new(Some(machine.to_string())),
            user: Mutex::new(Some(user.to_string())),
        }
    }

    /// Create a source with neither scope set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the machine-scope value.
    pub fn set_machine_path(&self, value: &str) {
        *self.machine.lock().unwrap_or_else(|e| e.into_inner()) = Some(value.to_string());
    }

    /// Replace the user-scope value.
    pub fn set_user_path(&self, value: &str) {
        *self.user.lock().unwrap_or_else(|e| e.into_inner()) = Some(value.to_string());
    }
}

impl EnvironmentSource for StaticEnvironment {
    fn machine_path(&self) -> Result<Option<String>> {
        Ok(self.machine.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn user_path(&self) -> Result<Option<String>> {
        Ok(self.user.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }
}

/// The source appropriate for this platform.
pub fn default_source() -> Box<dyn EnvironmentSource> {
    if cfg!(windows) {
        Box::new(RegistryEnvironment::new())
    } else {
        Box::new(ProcessEnvironment)
    }
}

/// Extract `(type, data)` for `value_name` from `reg query` output.
///
/// ```
/// use gifstudio_setup::environment::parse_reg_query;
///
/// let out = "\r\nHKEY_CURRENT_USER\\Environment\r\n    Path    REG_EXPAND_SZ    %USERPROFILE%\\bin;C:\\tools\r\n\r\n";
/// let (kind, data) = parse_reg_query(out, "Path").unwrap();
/// assert_eq!(kind, "REG_EXPAND_SZ");
/// assert_eq!(data, "%USERPROFILE%\\bin;C:\\tools");
/// ```
pub fn parse_reg_query(output: &str, value_name: &str) -> Option<(String, String)> {
    let line_re = Regex::new(r"^\s*(\S+)\s+(REG_[A-Z_]+)\s*(.*)$").expect("static regex");

    output.lines().find_map(|line| {
        let caps = line_re.captures(line.trim_end())?;
        if !caps[1].eq_ignore_ascii_case(value_name) {
            return None;
        }
        Some((caps[2].to_string(), caps[3].trim().to_string()))
    })
}

/// Expand `%NAME%` references; unknown names are left as written.
pub fn expand_env_vars<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let var_re = Regex::new(r"%([^%;]+)%").expect("static regex");
    var_re
        .replace_all(value, |caps: &regex::Captures<'_>| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
