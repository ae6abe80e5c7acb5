//! Configuration file discovery and loading.
//!
//! Layers are merged in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. User global config (`~/.gifstudio/setup.yml`)
//! 3. Working-directory config (`./gifstudio-setup.yml`)
//! 4. Explicit `--config` file
//! 5. `GIFSTUDIO_*` environment variables

use crate::config::merger::merge_layers;
use crate::config::schema::SetupConfig;
use crate::config::validator::validate;
use crate::error::{Result, SetupError};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "gifstudio-setup.yml";

/// Environment variable overriding the interpreter version.
pub const ENV_PYTHON_VERSION: &str = "GIFSTUDIO_PYTHON_VERSION";
/// Environment variable overriding the installer URL.
pub const ENV_PYTHON_URL: &str = "GIFSTUDIO_PYTHON_URL";
/// Environment variable overriding the installer checksum.
pub const ENV_PYTHON_SHA256: &str = "GIFSTUDIO_PYTHON_SHA256";
/// Environment variable overriding the interpreter command.
pub const ENV_PYTHON_COMMAND: &str = "GIFSTUDIO_PYTHON";

/// Paths to configuration files in merge order.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User's global config: ~/.gifstudio/setup.yml
    pub user_global: Option<PathBuf>,

    /// Working-directory config: ./gifstudio-setup.yml
    pub project: Option<PathBuf>,

    /// File passed with `--config`; must exist.
    pub explicit: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files using the real home directory.
    pub fn discover(working_dir: &Path, explicit: Option<&Path>) -> Self {
        Self::discover_with_home(working_dir, dirs::home_dir().as_deref(), explicit)
    }

    /// Discover config files with an explicit home directory.
    pub fn discover_with_home(
        working_dir: &Path,
        home: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Self {
        let user_global = home
            .map(|h| h.join(".gifstudio").join("setup.yml"))
            .filter(|p| p.is_file());
        let project = Some(working_dir.join(PROJECT_CONFIG_FILE)).filter(|p| p.is_file());

        Self {
            user_global,
            project,
            explicit: explicit.map(Path::to_path_buf),
        }
    }

    /// All config paths in merge order.
    pub fn all(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.explicit]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Load a config file as a raw YAML value (for merging).
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SetupError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SetupError::Io(e)
        }
    })?;

    // An empty file is a valid (empty) layer.
    if content.trim().is_empty() {
        return Ok(serde_yaml::Value::Mapping(Default::default()));
    }

    serde_yaml::from_str(&content).map_err(|e| SetupError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse YAML content into a config.
pub fn parse_config(content: &str, source_path: &Path) -> Result<SetupConfig> {
    serde_yaml::from_str(content).map_err(|e| SetupError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply `GIFSTUDIO_*` overrides from an environment lookup.
pub fn apply_env_overrides<F>(config: &mut SetupConfig, env_fn: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(version) = env_fn(ENV_PYTHON_VERSION) {
        tracing::debug!("{} overrides interpreter version", ENV_PYTHON_VERSION);
        config.interpreter.version = version;
    }
    if let Some(url) = env_fn(ENV_PYTHON_URL) {
        tracing::debug!("{} overrides installer URL", ENV_PYTHON_URL);
        config.interpreter.installer_url = Some(url);
    }
    if let Some(sha) = env_fn(ENV_PYTHON_SHA256) {
        config.interpreter.sha256 = Some(sha);
    }
    if let Some(command) = env_fn(ENV_PYTHON_COMMAND) {
        config.interpreter.command = command;
    }
}

/// Merge the given config layers, apply env overrides, and validate.
pub fn load_config_from<F>(paths: &ConfigPaths, env_fn: F) -> Result<SetupConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut layers = Vec::new();
    for path in paths.all() {
        tracing::debug!("Loading config layer {}", path.display());
        layers.push(load_config_value(path)?);
    }

    let merged = merge_layers(&layers);
    let source = paths
        .all()
        .last()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));

    let mut config: SetupConfig =
        serde_yaml::from_value(merged).map_err(|e| SetupError::ConfigParseError {
            path: source,
            message: format!("Failed to parse merged config: {}", e),
        })?;

    apply_env_overrides(&mut config, env_fn);
    validate(&config)?;
    Ok(config)
}

/// Load the effective configuration for a working directory.
pub fn load_config(working_dir: &Path, explicit: Option<&Path>) -> Result<SetupConfig> {
    let paths = ConfigPaths::discover(working_dir, explicit);
    load_config_from(&paths, |key| {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DEFAULT_PYTHON_VERSION;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn no_files_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::discover_with_home(temp.path(), None, None);
        assert!(paths.all().is_empty());

        let config = load_config_from(&paths, no_env).unwrap();
        assert_eq!(config, SetupConfig::default());
    }

    #[test]
    fn discovers_project_and_user_files() {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(project.path().join(PROJECT_CONFIG_FILE), "{}").unwrap();
        fs::create_dir_all(home.path().join(".gifstudio")).unwrap();
        fs::write(home.path().join(".gifstudio/setup.yml"), "{}").unwrap();

        let paths = ConfigPaths::discover_with_home(project.path(), Some(home.path()), None);
        assert!(paths.user_global.is_some());
        assert!(paths.project.is_some());
        assert_eq!(paths.all().len(), 2);
    }

    #[test]
    fn project_overrides_user_global() {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join(".gifstudio")).unwrap();
        fs::write(
            home.path().join(".gifstudio/setup.yml"),
            "interpreter:\n  version: '3.10.11'\n  command: py\n",
        )
        .unwrap();
        fs::write(
            project.path().join(PROJECT_CONFIG_FILE),
            "interpreter:\n  version: '3.11.9'\n",
        )
        .unwrap();

        let paths = ConfigPaths::discover_with_home(project.path(), Some(home.path()), None);
        let config = load_config_from(&paths, no_env).unwrap();
        assert_eq!(config.interpreter.version, "3.11.9");
        assert_eq!(config.interpreter.command, "py");
    }

    #[test]
    fn explicit_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");
        let paths = ConfigPaths::discover_with_home(temp.path(), None, Some(&missing));
        let err = load_config_from(&paths, no_env).unwrap_err();
        assert!(matches!(err, SetupError::ConfigNotFound { .. }));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(PROJECT_CONFIG_FILE);
        fs::write(&path, "interpreter: [unclosed").unwrap();
        let paths = ConfigPaths::discover_with_home(temp.path(), None, None);
        let err = load_config_from(&paths, no_env).unwrap_err();
        assert!(err.to_string().contains(PROJECT_CONFIG_FILE));
    }

    #[test]
    fn empty_file_is_accepted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PROJECT_CONFIG_FILE), "").unwrap();
        let paths = ConfigPaths::discover_with_home(temp.path(), None, None);
        let config = load_config_from(&paths, no_env).unwrap();
        assert_eq!(config.interpreter.version, DEFAULT_PYTHON_VERSION);
    }

    #[test]
    fn env_overrides_win_over_files() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            "interpreter:\n  version: '3.11.9'\n",
        )
        .unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_PYTHON_VERSION, "3.13.0"),
            (ENV_PYTHON_URL, "https://mirror.example.com/python.exe"),
            (ENV_PYTHON_COMMAND, "py"),
        ]
        .into_iter()
        .collect();

        let paths = ConfigPaths::discover_with_home(temp.path(), None, None);
        let config = load_config_from(&paths, |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.interpreter.version, "3.13.0");
        assert_eq!(
            config.interpreter.installer_url(),
            "https://mirror.example.com/python.exe"
        );
        assert_eq!(config.interpreter.command, "py");
    }

    #[test]
    fn invalid_values_fail_validation() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            "interpreter:\n  version: latest\n",
        )
        .unwrap();
        let paths = ConfigPaths::discover_with_home(temp.path(), None, None);
        let err = load_config_from(&paths, no_env).unwrap_err();
        assert!(matches!(err, SetupError::ConfigValidationError { .. }));
    }

    #[test]
    fn parse_config_reports_source() {
        let err = parse_config("interpreter: 5", Path::new("inline.yml")).unwrap_err();
        assert!(err.to_string().contains("inline.yml"));
    }
}
