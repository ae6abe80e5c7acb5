//! Scripted command runner for testing provisioning flows.
//!
//! Programs are resolvable only when declared, optionally only while a
//! given directory is on the environment's search path. Every attempted
//! invocation is recorded, including ones that fail to resolve.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::environment::EnvironmentContext;
use crate::error::{Result, SetupError};

use super::command::{CommandResult, CommandRunner, CommandSpec};

type Matcher = Box<dyn Fn(&CommandSpec) -> bool>;
type Responder = Box<dyn Fn(&CommandSpec) -> Result<CommandResult>>;

struct Rule {
    matcher: Matcher,
    respond: Responder,
}

/// A [`CommandRunner`] whose programs and responses are declared up front.
///
/// # Example
///
/// ```
/// use gifstudio_setup::environment::EnvironmentContext;
/// use gifstudio_setup::shell::{CommandRunner, CommandSpec, ScriptedRunner};
///
/// let runner = ScriptedRunner::new()
///     .available("python")
///     .on("python", |_| Ok(ScriptedRunner::output(0, "Python 3.12.7\n")));
///
/// let env = EnvironmentContext::default();
/// let result = runner.run(&CommandSpec::new("python").arg("--version"), &env).unwrap();
/// assert!(result.stdout.contains("3.12.7"));
/// assert_eq!(runner.calls().len(), 1);
/// ```
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    available: Vec<String>,
    installed: Vec<(String, PathBuf)>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    /// Create a runner where nothing resolves.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program` resolvable regardless of the search path.
    pub fn available(mut self, program: &str) -> Self {
        self.available.push(program.to_string());
        self
    }

    /// Make `program` resolvable only while `dir` is on the search path.
    pub fn install_at(mut self, program: &str, dir: impl Into<PathBuf>) -> Self {
        self.installed.push((program.to_string(), dir.into()));
        self
    }

    /// Respond to invocations of `program`.
    ///
    /// Rules are tried in registration order; unmatched invocations of a
    /// resolvable program succeed with empty output.
    pub fn on<F>(self, program: &str, respond: F) -> Self
    where
        F: Fn(&CommandSpec) -> Result<CommandResult> + 'static,
    {
        let program = program.to_string();
        self.when(move |spec| program_matches(&program, &spec.program), respond)
    }

    /// Respond to invocations of `program` whose arguments start with `prefix`.
    pub fn on_args<F>(self, program: &str, prefix: &[&str], respond: F) -> Self
    where
        F: Fn(&CommandSpec) -> Result<CommandResult> + 'static,
    {
        let program = program.to_string();
        let prefix: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
        self.when(
            move |spec| {
                program_matches(&program, &spec.program)
                    && spec.args.len() >= prefix.len()
                    && spec.args.iter().zip(&prefix).all(|(a, p)| a == p)
            },
            respond,
        )
    }

    /// Respond to any invocation accepted by `matcher`.
    pub fn when<M, F>(mut self, matcher: M, respond: F) -> Self
    where
        M: Fn(&CommandSpec) -> bool + 'static,
        F: Fn(&CommandSpec) -> Result<CommandResult> + 'static,
    {
        self.rules.push(Rule {
            matcher: Box::new(matcher),
            respond: Box::new(respond),
        });
        self
    }

    /// A finished result with `code` and `stdout`.
    pub fn output(code: i32, stdout: &str) -> CommandResult {
        if code == 0 {
            CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO)
        } else {
            CommandResult::failure(Some(code), stdout.to_string(), String::new(), Duration::ZERO)
        }
    }

    /// Every attempted invocation, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Number of attempted invocations of `program`.
    pub fn count(&self, program: &str) -> usize {
        self.count_matching(|spec| program_matches(program, &spec.program))
    }

    /// Number of attempted invocations accepted by `pred`.
    pub fn count_matching<P>(&self, pred: P) -> usize
    where
        P: Fn(&CommandSpec) -> bool,
    {
        self.calls.borrow().iter().filter(|s| pred(s)).count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn resolve(&self, program: &str, env: &EnvironmentContext) -> Option<PathBuf> {
        if self.available.iter().any(|p| p == program) {
            return Some(PathBuf::from(program));
        }

        if let Some((_, dir)) = self
            .installed
            .iter()
            .find(|(p, dir)| p == program && env.search_path().contains(&dir.to_string_lossy()))
        {
            return Some(dir.join(program));
        }

        let direct = Path::new(program);
        (direct.components().count() > 1 && direct.is_file()).then(|| direct.to_path_buf())
    }

    fn run(&self, spec: &CommandSpec, env: &EnvironmentContext) -> Result<CommandResult> {
        self.calls.borrow_mut().push(spec.clone());

        if self.resolve(&spec.program, env).is_none() {
            return Err(SetupError::ProgramNotFound {
                program: spec.program.clone(),
            });
        }

        match self.rules.iter().find(|r| (r.matcher)(spec)) {
            Some(rule) => (rule.respond)(spec),
            None => Ok(Self::output(0, "")),
        }
    }
}

fn program_matches(expected: &str, actual: &str) -> bool {
    actual == expected
        || Path::new(actual)
            .file_stem()
            .map(|s| s.to_string_lossy() == expected)
            .unwrap_or(false)
}
