//! Read-only availability report.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::SetupConfig;
use crate::environment::EnvironmentContext;
use crate::ui::UserInterface;

use super::context::ProvisionContext;
use super::media_tool::{discover_in, system_dirs, MediaToolInfo};
use super::modules::{check_modules, install_hint, missing_packages, ModuleStatus};
use super::probe::{probe_interpreter, probe_package_manager, InterpreterInfo};

/// What is installed and usable right now.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    /// Whether the process is elevated (needed only for installing).
    pub elevated: bool,
    /// The interpreter, if it runs.
    pub interpreter: Option<InterpreterInfo>,
    /// Package manager version line, if it runs.
    pub package_manager: Option<String>,
    /// Required modules.
    pub modules: Vec<ModuleStatus>,
    /// The media tool, if found.
    pub media_tool: Option<MediaToolInfo>,
}

impl DoctorReport {
    /// Whether the application can start.
    pub fn is_healthy(&self) -> bool {
        self.interpreter.is_some()
            && self.package_manager.is_some()
            && self.modules.iter().all(|m| m.available)
            && self.media_tool.is_some()
    }

    /// Package names to install for the missing modules.
    pub fn missing_packages(&self) -> Vec<String> {
        missing_packages(&self.modules)
    }

    /// Print a human-readable summary.
    pub fn render(&self, python: &str, ui: &mut dyn UserInterface) {
        ui.show_header("GIF Studio Doctor");

        if self.elevated {
            ui.success("Running with administrator privileges");
        } else {
            ui.message("Not elevated (required only for installing the interpreter)");
        }

        match &self.interpreter {
            Some(info) => ui.success(&format!("Python {} ({})", info.version, info.command)),
            None => {
                ui.error(&format!("Python not found ({})", python));
                ui.show_hint("Run: gifstudio-setup interpreter");
            }
        }

        match &self.package_manager {
            Some(line) => ui.success(line),
            None => ui.error("pip is not available"),
        }

        for module in &self.modules {
            if module.available {
                ui.success(&format!("{} ({})", module.module, module.package));
            } else {
                ui.error(&format!("{} missing ({})", module.module, module.package));
            }
        }
        let missing = self.missing_packages();
        if !missing.is_empty() {
            ui.show_hint(&format!("Run: {}", install_hint(python, &missing)));
        }

        match &self.media_tool {
            Some(tool) => {
                ui.success(&format!("{} at {}", tool.version, tool.path.display()));
                if tool.probe.is_none() {
                    ui.warning("ffprobe was not found next to ffmpeg");
                }
            }
            None => {
                ui.error("ffmpeg not found");
                ui.show_hint("Run: gifstudio-setup deps");
            }
        }

        if self.is_healthy() {
            ui.success("Everything GIF Studio needs is installed");
        }
    }
}

/// Inspect the machine without changing it.
///
/// The search path is re-read from the persisted settings first, so a
/// shell opened before an install still sees what was installed.
pub fn diagnose(
    ctx: &ProvisionContext<'_>,
    env: &EnvironmentContext,
    config: &SetupConfig,
    working_dir: &Path,
) -> DoctorReport {
    diagnose_in(ctx, env, config, working_dir, &system_dirs())
}

/// Like [`diagnose`], with explicit fallback directories for the media tool.
pub fn diagnose_in(
    ctx: &ProvisionContext<'_>,
    env: &EnvironmentContext,
    config: &SetupConfig,
    working_dir: &Path,
    media_dirs: &[PathBuf],
) -> DoctorReport {
    let mut env = env.clone();
    if let Err(e) = env.refresh(ctx.env_source) {
        tracing::warn!("Could not refresh the search path, keeping the current one: {}", e);
    }
    let env = &env;

    let python = &config.interpreter.command;
    let interpreter = probe_interpreter(ctx.runner, env, python);

    let (package_manager, modules) = if interpreter.is_some() {
        (
            probe_package_manager(ctx.runner, env, python),
            check_modules(ctx.runner, env, python, &config.required_modules()),
        )
    } else {
        let modules = config
            .required_modules()
            .into_iter()
            .map(|req| ModuleStatus {
                module: req.module,
                package: req.package,
                available: false,
            })
            .collect();
        (None, modules)
    };

    DoctorReport {
        elevated: (ctx.is_elevated)(),
        interpreter,
        package_manager,
        modules,
        media_tool: discover_in(
            ctx.runner,
            env,
            &config.dependencies.media_tool.name,
            working_dir,
            media_dirs,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{SearchPath, StaticEnvironment, SEPARATOR};
    use crate::provision::download::FakeDownloader;
    use crate::shell::ScriptedRunner;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn diagnose_with(runner: &ScriptedRunner, working_dir: &Path) -> DoctorReport {
        diagnose_from(runner, working_dir, &StaticEnvironment::empty())
    }

    fn diagnose_from(
        runner: &ScriptedRunner,
        working_dir: &Path,
        source: &StaticEnvironment,
    ) -> DoctorReport {
        let downloader = FakeDownloader::failing("unused");
        let is_elevated = || false;
        let ctx = ProvisionContext {
            runner,
            downloader: &downloader,
            env_source: source,
            is_elevated: &is_elevated,
            temp_dir: std::env::temp_dir(),
        };
        diagnose_in(
            &ctx,
            &EnvironmentContext::with_search_path(SearchPath::parse("/usr/bin")),
            &SetupConfig::default(),
            working_dir,
            &[],
        )
    }

    fn healthy_runner() -> ScriptedRunner {
        ScriptedRunner::new()
            .available("python")
            .available("ffmpeg")
            .on_args("python", &["--version"], |_| {
                Ok(ScriptedRunner::output(0, "Python 3.12.7\n"))
            })
            .on_args("python", &["-m", "pip", "--version"], |_| {
                Ok(ScriptedRunner::output(0, "pip 24.2\n"))
            })
            .on("ffmpeg", |_| {
                Ok(ScriptedRunner::output(0, "ffmpeg version 7.1\n"))
            })
    }

    #[test]
    fn healthy_machine() {
        let temp = TempDir::new().unwrap();
        let report = diagnose_with(&healthy_runner(), temp.path());

        assert!(report.is_healthy());
        assert!(!report.elevated);
        assert_eq!(report.interpreter.as_ref().unwrap().version, "3.12.7");
        assert_eq!(report.package_manager.as_deref(), Some("pip 24.2"));
        assert!(report.missing_packages().is_empty());
    }

    #[test]
    fn missing_interpreter_skips_module_checks() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let report = diagnose_with(&runner, temp.path());

        assert!(!report.is_healthy());
        assert!(report.modules.iter().all(|m| !m.available));
        assert!(report.missing_packages().contains(&"Pillow".to_string()));
        assert_eq!(
            runner.count_matching(|s| s.args.first().map(|a| a == "-c").unwrap_or(false)),
            0
        );
    }

    #[test]
    fn render_prints_install_hint() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new()
            .available("python")
            .on_args("python", &["--version"], |_| {
                Ok(ScriptedRunner::output(0, "Python 3.12.7\n"))
            })
            .on_args("python", &["-c", "import yt_dlp"], |_| {
                Ok(ScriptedRunner::output(1, ""))
            });
        let report = diagnose_with(&runner, temp.path());
        let mut ui = MockUI::new();

        report.render("python", &mut ui);

        assert!(report.media_tool.is_none());
        assert!(ui.has_hint("python -m pip install yt-dlp"));
        assert!(ui.has_error("ffmpeg not found"));
        assert!(ui.has_hint("Run: gifstudio-setup deps"));
        assert!(!ui.has_success("Everything GIF Studio needs is installed"));
    }

    #[test]
    fn persisted_search_path_is_read_before_checking() {
        let temp = TempDir::new().unwrap();
        let source = StaticEnvironment::new(
            &format!("/opt/python312{}/usr/bin", SEPARATOR),
            "/opt/ffmpeg/bin",
        );
        let runner = ScriptedRunner::new()
            .install_at("python", "/opt/python312")
            .install_at("ffmpeg", "/opt/ffmpeg/bin")
            .on_args("python", &["--version"], |_| {
                Ok(ScriptedRunner::output(0, "Python 3.12.7\n"))
            })
            .on_args("python", &["-m", "pip", "--version"], |_| {
                Ok(ScriptedRunner::output(0, "pip 24.2\n"))
            })
            .on("ffmpeg", |_| {
                Ok(ScriptedRunner::output(0, "ffmpeg version 7.1\n"))
            });

        let report = diagnose_from(&runner, temp.path(), &source);

        assert!(report.is_healthy());
        assert_eq!(report.interpreter.unwrap().version, "3.12.7");
    }

    #[test]
    fn report_serializes_to_json() {
        let temp = TempDir::new().unwrap();
        let report = diagnose_with(&healthy_runner(), temp.path());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["interpreter"]["version"], "3.12.7");
        assert_eq!(json["media_tool"]["version"], "ffmpeg version 7.1");
        assert!(json["modules"].is_array());
    }
}
