//! Program execution against an explicit environment.

use crate::environment::EnvironmentContext;
use crate::error::{Result, SetupError};
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// A program invocation: executable name (or path) plus arguments.
///
/// No shell is involved, so arguments are passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name resolved on the search path, or a path to it.
    pub program: String,

    /// Arguments, in order.
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create an invocation with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build from a command line given as program followed by arguments.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone()).args(args))
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of executing a program.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Standard output followed by standard error.
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }

    /// First non-empty line of the combined output.
    pub fn first_line(&self) -> Option<String> {
        self.combined_output()
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string)
    }
}

/// Output line from command execution.
#[derive(Debug, Clone)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Callback for streaming output.
pub type OutputCallback = Box<dyn Fn(OutputLine) + Send>;

/// Runs programs for the provisioning steps.
///
/// Every invocation receives the [`EnvironmentContext`] explicitly, so a
/// refreshed search path reaches only the children spawned after it.
pub trait CommandRunner {
    /// Locate `program` for `env`. Paths are checked directly.
    fn resolve(&self, program: &str, env: &EnvironmentContext) -> Option<PathBuf> {
        env.which(program)
    }

    /// Run `spec` to completion.
    ///
    /// Returns [`SetupError::ProgramNotFound`] when the program cannot be
    /// located; a non-zero exit is an `Ok` result with `success == false`.
    fn run(&self, spec: &CommandSpec, env: &EnvironmentContext) -> Result<CommandResult>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn resolve(&self, program: &str, env: &EnvironmentContext) -> Option<PathBuf> {
        (**self).resolve(program, env)
    }

    fn run(&self, spec: &CommandSpec, env: &EnvironmentContext) -> Result<CommandResult> {
        (**self).run(spec, env)
    }
}

/// Spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    echo: bool,
}

impl SystemRunner {
    /// Capture output without printing it.
    pub fn quiet() -> Self {
        Self { echo: false }
    }

    /// Print each output line as it arrives.
    pub fn echoing() -> Self {
        Self { echo: true }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec, env: &EnvironmentContext) -> Result<CommandResult> {
        let program = self
            .resolve(&spec.program, env)
            .ok_or_else(|| SetupError::ProgramNotFound {
                program: spec.program.clone(),
            })?;

        tracing::debug!("Running {} ({})", spec, program.display());

        let callback: Option<OutputCallback> = if self.echo {
            Some(Box::new(|line| match line {
                OutputLine::Stdout(l) => println!("    {}", l),
                OutputLine::Stderr(l) => eprintln!("    {}", l),
            }))
        } else {
            None
        };

        execute_streaming(&program, spec, env, callback)
    }
}

/// Spawn `program` with the arguments of `spec`, collecting both streams.
///
/// Lines are forwarded to `callback` as they arrive.
pub fn execute_streaming(
    program: &Path,
    spec: &CommandSpec,
    env: &EnvironmentContext,
    callback: Option<OutputCallback>,
) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(&spec.args);
    env.apply_to(&mut cmd);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| spawn_error(spec, e))?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(SetupError::CommandFailed {
            command: spec.to_string(),
            message: "output pipes unavailable".to_string(),
        });
    };

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle = thread::spawn(move || {
        let reader = BufReader::new(stdout);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stdout.send(OutputLine::Stdout(line));
        }
        output
    });

    let stderr_handle = thread::spawn(move || {
        let reader = BufReader::new(stderr);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stderr.send(OutputLine::Stderr(line));
        }
        output
    });

    for line in rx {
        if let Some(cb) = &callback {
            cb(line);
        }
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child.wait().map_err(|e| SetupError::CommandFailed {
        command: spec.to_string(),
        message: e.to_string(),
    })?;

    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(
            stdout_output,
            stderr_output,
            duration,
        ))
    } else {
        Ok(CommandResult::failure(
            status.code(),
            stdout_output,
            stderr_output,
            duration,
        ))
    }
}

fn spawn_error(spec: &CommandSpec, err: std::io::Error) -> SetupError {
    if err.kind() == std::io::ErrorKind::NotFound {
        SetupError::ProgramNotFound {
            program: spec.program.clone(),
        }
    } else {
        SetupError::CommandFailed {
            command: spec.to_string(),
            message: err.to_string(),
        }
    }
}
