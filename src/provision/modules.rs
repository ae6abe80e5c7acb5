//! Importability checks for the Python modules the application needs.

use serde::Serialize;

use crate::config::ModuleRequirement;
use crate::environment::EnvironmentContext;
use crate::shell::{CommandRunner, CommandSpec};

/// Whether one module imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleStatus {
    /// Import name.
    pub module: String,
    /// Package providing it.
    pub package: String,
    /// Whether `import <module>` succeeded.
    pub available: bool,
}

/// Try `<python> -c "import <module>"` for each requirement.
pub fn check_modules(
    runner: &dyn CommandRunner,
    env: &EnvironmentContext,
    python: &str,
    modules: &[ModuleRequirement],
) -> Vec<ModuleStatus> {
    modules
        .iter()
        .map(|req| {
            let spec = CommandSpec::new(python)
                .arg("-c")
                .arg(format!("import {}", req.module));
            let available = runner.run(&spec, env).map(|r| r.success).unwrap_or(false);
            ModuleStatus {
                module: req.module.clone(),
                package: req.package.clone(),
                available,
            }
        })
        .collect()
}

/// Package names of the modules that failed to import.
pub fn missing_packages(statuses: &[ModuleStatus]) -> Vec<String> {
    statuses
        .iter()
        .filter(|s| !s.available)
        .map(|s| s.package.clone())
        .collect()
}

/// Command that installs `packages`.
pub fn install_hint(python: &str, packages: &[String]) -> String {
    format!("{} -m pip install {}", python, packages.join(" "))
}
