//! Version probes for installed programs.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::environment::EnvironmentContext;
use crate::shell::{CommandRunner, CommandSpec};

/// A resolved interpreter and the version it reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpreterInfo {
    /// Command used to invoke it.
    pub command: String,
    /// Version reported by `--version`.
    pub version: String,
}

fn python_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Python (\d+\.\d+\.\d+)").expect("static regex"))
}

/// Extract the version from `python --version` output.
pub fn parse_python_version(output: &str) -> Option<String> {
    python_version_re()
        .captures(output)
        .map(|caps| caps[1].to_string())
}

/// Run `<command> --version`; `None` when missing or failing.
pub fn probe_interpreter(
    runner: &dyn CommandRunner,
    env: &EnvironmentContext,
    command: &str,
) -> Option<InterpreterInfo> {
    let spec = CommandSpec::new(command).arg("--version");
    let result = runner.run(&spec, env).ok()?;
    if !result.success {
        tracing::debug!("{} exited with {:?}", spec, result.exit_code);
        return None;
    }

    // Older releases print the version on stderr.
    parse_python_version(&result.combined_output()).map(|version| InterpreterInfo {
        command: command.to_string(),
        version,
    })
}

/// Run `<command> -m pip --version`; the first output line when it succeeds.
pub fn probe_package_manager(
    runner: &dyn CommandRunner,
    env: &EnvironmentContext,
    command: &str,
) -> Option<String> {
    let spec = CommandSpec::new(command).args(["-m", "pip", "--version"]);
    match runner.run(&spec, env) {
        Ok(result) if result.success => Some(result.first_line().unwrap_or_default()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ScriptedRunner;

    #[test]
    fn parses_version_line() {
        assert_eq!(
            parse_python_version("Python 3.12.7\n").as_deref(),
            Some("3.12.7")
        );
        assert_eq!(parse_python_version("pyenv: no such command"), None);
    }

    #[test]
    fn probe_reads_stderr_version() {
        let runner = ScriptedRunner::new().available("python").on("python", |_| {
            Ok(crate::shell::CommandResult::success(
                String::new(),
                "Python 2.7.18\n".into(),
                std::time::Duration::ZERO,
            ))
        });
        let info = probe_interpreter(&runner, &EnvironmentContext::default(), "python").unwrap();
        assert_eq!(info.version, "2.7.18");
    }

    #[test]
    fn probe_missing_interpreter_is_none() {
        let runner = ScriptedRunner::new();
        assert!(probe_interpreter(&runner, &EnvironmentContext::default(), "python").is_none());
    }

    #[test]
    fn probe_failing_interpreter_is_none() {
        let runner = ScriptedRunner::new()
            .available("python")
            .on("python", |_| Ok(ScriptedRunner::output(9009, "")));
        assert!(probe_interpreter(&runner, &EnvironmentContext::default(), "python").is_none());
    }

    #[test]
    fn package_manager_probe_returns_first_line() {
        let runner = ScriptedRunner::new().available("python").on_args(
            "python",
            &["-m", "pip"],
            |_| Ok(ScriptedRunner::output(0, "pip 24.2 from C:\\Python312\\Lib\n")),
        );
        let line = probe_package_manager(&runner, &EnvironmentContext::default(), "python");
        assert_eq!(line.as_deref(), Some("pip 24.2 from C:\\Python312\\Lib"));
    }
}
