//! Media tool discovery.
//!
//! The tool is looked up on the search path first, then beside the
//! working directory, then in well-known install locations. A candidate
//! only counts if `<tool> -version` runs and identifies itself.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::environment::EnvironmentContext;
use crate::shell::{CommandRunner, CommandSpec};

/// A working media tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaToolInfo {
    /// How the tool was invoked (bare name when found on the search path).
    pub path: PathBuf,
    /// First line of the version output.
    pub version: String,
    /// Companion probe binary next to it, if any.
    pub probe: Option<PathBuf>,
}

/// Install locations checked after the search path and working directory.
pub fn system_dirs() -> Vec<PathBuf> {
    let dirs: &[&str] = if cfg!(windows) {
        &[
            "C:/ffmpeg/bin",
            "C:/Program Files/ffmpeg/bin",
            "C:/Program Files (x86)/ffmpeg/bin",
        ]
    } else {
        &["/usr/bin", "/usr/local/bin", "/opt/homebrew/bin"]
    };
    dirs.iter().map(PathBuf::from).collect()
}

fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

/// Candidates in lookup order, excluding the bare search-path name.
pub fn candidate_paths(name: &str, working_dir: &Path, extra_dirs: &[PathBuf]) -> Vec<PathBuf> {
    let exe = executable_name(name);
    let mut candidates = vec![working_dir.join(&exe), working_dir.join("bin").join(&exe)];
    candidates.extend(extra_dirs.iter().map(|dir| dir.join(&exe)));
    candidates
}

/// Find a working `name` binary.
pub fn discover(
    runner: &dyn CommandRunner,
    env: &EnvironmentContext,
    name: &str,
    working_dir: &Path,
) -> Option<MediaToolInfo> {
    discover_in(runner, env, name, working_dir, &system_dirs())
}

/// Like [`discover`], with explicit fallback directories.
pub fn discover_in(
    runner: &dyn CommandRunner,
    env: &EnvironmentContext,
    name: &str,
    working_dir: &Path,
    extra_dirs: &[PathBuf],
) -> Option<MediaToolInfo> {
    if let Some(version) = identify(runner, env, name, name) {
        let resolved = runner.resolve(name, env);
        let probe = resolved.as_deref().and_then(companion_probe);
        return Some(MediaToolInfo {
            path: PathBuf::from(name),
            version,
            probe,
        });
    }

    candidate_paths(name, working_dir, extra_dirs)
        .into_iter()
        .filter(|path| path.is_file())
        .find_map(|path| {
            let version = identify(runner, env, name, &path.to_string_lossy())?;
            tracing::debug!("Found {} at {}", name, path.display());
            Some(MediaToolInfo {
                probe: companion_probe(&path),
                path,
                version,
            })
        })
}

fn identify(
    runner: &dyn CommandRunner,
    env: &EnvironmentContext,
    name: &str,
    program: &str,
) -> Option<String> {
    let spec = CommandSpec::new(program).arg("-version");
    let result = runner.run(&spec, env).ok()?;
    if !result.success {
        return None;
    }
    let marker = format!("{} version", name).to_lowercase();
    if !result.combined_output().to_lowercase().contains(&marker) {
        tracing::debug!("{} does not identify as {}", program, name);
        return None;
    }
    result.first_line()
}

fn companion_probe(tool: &Path) -> Option<PathBuf> {
    let probe = tool.with_file_name(executable_name("ffprobe"));
    probe.is_file().then_some(probe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ScriptedRunner;
    use tempfile::TempDir;

    const VERSION_OUTPUT: &str = "ffmpeg version 6.1.1 Copyright (c) 2000-2023\nconfiguration: --enable-gpl\n";

    #[test]
    fn found_on_search_path() {
        let runner = ScriptedRunner::new()
            .available("ffmpeg")
            .on("ffmpeg", |_| Ok(ScriptedRunner::output(0, VERSION_OUTPUT)));
        let temp = TempDir::new().unwrap();

        let info = discover_in(&runner, &EnvironmentContext::default(), "ffmpeg", temp.path(), &[])
            .unwrap();

        assert_eq!(info.path, PathBuf::from("ffmpeg"));
        assert_eq!(info.version, "ffmpeg version 6.1.1 Copyright (c) 2000-2023");
    }

    #[test]
    fn falls_back_to_working_dir_bin() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let tool = bin.join(executable_name("ffmpeg"));
        std::fs::write(&tool, "").unwrap();
        std::fs::write(bin.join(executable_name("ffprobe")), "").unwrap();

        let runner =
            ScriptedRunner::new().on("ffmpeg", |_| Ok(ScriptedRunner::output(0, VERSION_OUTPUT)));

        let info = discover_in(&runner, &EnvironmentContext::default(), "ffmpeg", temp.path(), &[])
            .unwrap();

        assert_eq!(info.path, tool);
        assert_eq!(info.probe, Some(bin.join(executable_name("ffprobe"))));
        // Search path attempt first, then the bin candidate.
        assert_eq!(runner.count("ffmpeg"), 2);
    }

    #[test]
    fn extra_dirs_are_checked_last() {
        let temp = TempDir::new().unwrap();
        let system = TempDir::new().unwrap();
        std::fs::write(system.path().join(executable_name("ffmpeg")), "").unwrap();

        let runner =
            ScriptedRunner::new().on("ffmpeg", |_| Ok(ScriptedRunner::output(0, VERSION_OUTPUT)));

        let info = discover_in(
            &runner,
            &EnvironmentContext::default(),
            "ffmpeg",
            temp.path(),
            &[system.path().to_path_buf()],
        )
        .unwrap();

        assert!(info.path.starts_with(system.path()));
        assert!(info.probe.is_none());
    }

    #[test]
    fn version_marker_ignores_case() {
        let runner = ScriptedRunner::new()
            .available("ffmpeg")
            .on("ffmpeg", |_| Ok(ScriptedRunner::output(0, "FFMPEG VERSION n7.0-static\n")));
        let temp = TempDir::new().unwrap();

        let info = discover_in(&runner, &EnvironmentContext::default(), "ffmpeg", temp.path(), &[])
            .unwrap();

        assert_eq!(info.version, "FFMPEG VERSION n7.0-static");
    }

    #[test]
    fn rejects_binary_that_does_not_identify() {
        let runner = ScriptedRunner::new()
            .available("ffmpeg")
            .on("ffmpeg", |_| Ok(ScriptedRunner::output(0, "usage: something else")));
        let temp = TempDir::new().unwrap();

        assert!(
            discover_in(&runner, &EnvironmentContext::default(), "ffmpeg", temp.path(), &[])
                .is_none()
        );
    }

    #[test]
    fn candidate_order() {
        let candidates = candidate_paths("ffmpeg", Path::new("/work"), &[PathBuf::from("/sys")]);
        let exe = executable_name("ffmpeg");
        assert_eq!(
            candidates,
            vec![
                Path::new("/work").join(&exe),
                Path::new("/work").join("bin").join(&exe),
                Path::new("/sys").join(&exe),
            ]
        );
    }

    #[test]
    fn system_dirs_are_platform_specific() {
        let dirs = system_dirs();
        assert_eq!(dirs.len(), 3);
        if cfg!(windows) {
            assert!(dirs.contains(&PathBuf::from("C:/ffmpeg/bin")));
        } else {
            assert!(dirs.contains(&PathBuf::from("/usr/local/bin")));
        }
    }
}
