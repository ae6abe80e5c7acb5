//! Configuration schema definitions.
//!
//! This module contains the struct definitions that map to the
//! `gifstudio-setup.yml` file format. Every field has a default, so an
//! empty file (or no file at all) yields the stock provisioning plan.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Interpreter version installed when nothing else is configured.
pub const DEFAULT_PYTHON_VERSION: &str = "3.12.7";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SetupConfig {
    /// Interpreter installer settings
    pub interpreter: InterpreterConfig,

    /// Dependency installer settings
    pub dependencies: DependencyConfig,

    /// Python modules the application imports, checked by `doctor`
    pub modules: Vec<ModuleRequirement>,
}

/// Settings for the interpreter installer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Pinned interpreter version (X.Y.Z)
    pub version: String,

    /// Installer URL; derived from `version` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_url: Option<String>,

    /// Expected SHA-256 of the installer (hex)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// Arguments for the unattended install
    pub installer_args: Vec<String>,

    /// Interpreter command name resolved on the search path
    pub command: String,

    /// HTTP timeout for the installer download, in seconds
    pub download_timeout_secs: u64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_PYTHON_VERSION.to_string(),
            installer_url: None,
            sha256: None,
            installer_args: vec![
                "/quiet".to_string(),
                "InstallAllUsers=1".to_string(),
                "PrependPath=1".to_string(),
                "Include_test=0".to_string(),
            ],
            command: "python".to_string(),
            download_timeout_secs: 300,
        }
    }
}

impl InterpreterConfig {
    /// The installer URL, falling back to the python.org release for `version`.
    pub fn installer_url(&self) -> String {
        match &self.installer_url {
            Some(url) => url.clone(),
            None => format!(
                "https://www.python.org/ftp/python/{v}/python-{v}-amd64.exe",
                v = self.version
            ),
        }
    }

    /// File name of the downloaded installer (last URL segment).
    pub fn installer_file_name(&self) -> String {
        let url = self.installer_url();
        url.rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("python-installer.exe")
            .to_string()
    }

    /// Major.minor part of the pinned version (e.g. "3.12").
    pub fn minor_version(&self) -> String {
        self.version.split('.').take(2).collect::<Vec<_>>().join(".")
    }
}

/// Settings for the dependency installer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DependencyConfig {
    /// Packages installed in one batch
    pub packages: Vec<String>,

    /// Platform-specific packages installed in a separate invocation
    pub platform_packages: Vec<String>,

    /// External media tool
    pub media_tool: MediaToolConfig,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            packages: vec![
                "yt-dlp".to_string(),
                "Pillow".to_string(),
                "requests".to_string(),
            ],
            platform_packages: vec!["wmi".to_string()],
            media_tool: MediaToolConfig::default(),
        }
    }
}

/// The native media-processing binary and how the host installs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MediaToolConfig {
    /// Executable name (without extension)
    pub name: String,

    /// Host package manager command line (program followed by arguments)
    pub install: Vec<String>,
}

impl Default for MediaToolConfig {
    fn default() -> Self {
        Self {
            name: "ffmpeg".to_string(),
            install: default_media_install(),
        }
    }
}

fn default_media_install() -> Vec<String> {
    let args: &[&str] = if cfg!(windows) {
        &[
            "winget",
            "install",
            "--id",
            "Gyan.FFmpeg",
            "-e",
            "--accept-source-agreements",
            "--accept-package-agreements",
        ]
    } else if cfg!(target_os = "macos") {
        &["brew", "install", "ffmpeg"]
    } else {
        &["apt-get", "install", "-y", "ffmpeg"]
    };
    args.iter().map(|s| s.to_string()).collect()
}

/// A Python module the application imports and the package providing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModuleRequirement {
    /// Import name (e.g. "PIL")
    pub module: String,
    /// Package name for the package manager (e.g. "Pillow")
    pub package: String,
}

impl ModuleRequirement {
    /// Create a module requirement.
    pub fn new(module: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            package: package.into(),
        }
    }
}

/// The modules GIF Studio imports at start-up.
pub fn default_modules() -> Vec<ModuleRequirement> {
    let mut modules = vec![
        ModuleRequirement::new("yt_dlp", "yt-dlp"),
        ModuleRequirement::new("PIL", "Pillow"),
        ModuleRequirement::new("requests", "requests"),
    ];
    if cfg!(windows) {
        modules.push(ModuleRequirement::new("wmi", "wmi"));
    }
    modules
}

impl SetupConfig {
    /// Modules to check, falling back to [`default_modules`] when none are configured.
    pub fn required_modules(&self) -> Vec<ModuleRequirement> {
        if self.modules.is_empty() {
            default_modules()
        } else {
            self.modules.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_installer_url_is_version_pinned() {
        let config = InterpreterConfig::default();
        assert_eq!(
            config.installer_url(),
            format!(
                "https://www.python.org/ftp/python/{0}/python-{0}-amd64.exe",
                DEFAULT_PYTHON_VERSION
            )
        );
    }

    #[test]
    fn explicit_installer_url_wins() {
        let config = InterpreterConfig {
            installer_url: Some("https://mirror.example.com/py.exe".to_string()),
            ..Default::default()
        };
        assert_eq!(config.installer_url(), "https://mirror.example.com/py.exe");
        assert_eq!(config.installer_file_name(), "py.exe");
    }

    #[test]
    fn default_installer_args_are_unattended() {
        let config = InterpreterConfig::default();
        assert!(config.installer_args.contains(&"/quiet".to_string()));
        assert!(config.installer_args.contains(&"InstallAllUsers=1".to_string()));
        assert!(config.installer_args.contains(&"PrependPath=1".to_string()));
        assert!(config.installer_args.contains(&"Include_test=0".to_string()));
    }

    #[test]
    fn minor_version_strips_patch() {
        let config = InterpreterConfig {
            version: "3.11.9".to_string(),
            ..Default::default()
        };
        assert_eq!(config.minor_version(), "3.11");
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: SetupConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, SetupConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = r#"
interpreter:
  version: "3.11.9"
dependencies:
  packages: [yt-dlp]
"#;
        let config: SetupConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.interpreter.version, "3.11.9");
        assert_eq!(config.interpreter.command, "python");
        assert_eq!(config.dependencies.packages, vec!["yt-dlp".to_string()]);
        assert_eq!(config.dependencies.platform_packages, vec!["wmi".to_string()]);
        assert_eq!(config.dependencies.media_tool.name, "ffmpeg");
    }

    #[test]
    fn required_modules_fall_back_to_defaults() {
        let config = SetupConfig::default();
        let modules = config.required_modules();
        assert!(modules.iter().any(|m| m.module == "PIL" && m.package == "Pillow"));
    }

    #[test]
    fn configured_modules_replace_defaults() {
        let config = SetupConfig {
            modules: vec![ModuleRequirement::new("numpy", "numpy")],
            ..Default::default()
        };
        assert_eq!(config.required_modules().len(), 1);
    }
}
