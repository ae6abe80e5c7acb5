//! Integration tests for the command-line surface.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A command isolated from the caller's home config and env overrides.
fn setup_cmd(project: &TempDir, home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("gifstudio-setup"));
    cmd.current_dir(project.path())
        .env("HOME", home.path())
        .env("USERPROFILE", home.path())
        .env_remove("GIFSTUDIO_PYTHON_VERSION")
        .env_remove("GIFSTUDIO_PYTHON_URL")
        .env_remove("GIFSTUDIO_PYTHON_SHA256")
        .env_remove("GIFSTUDIO_PYTHON")
        .arg("--non-interactive");
    cmd
}

#[test]
fn help_lists_subcommands() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("gifstudio-setup"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("interpreter"))
        .stdout(predicate::str::contains("deps"))
        .stdout(predicate::str::contains("doctor"));
    Ok(())
}

#[test]
fn version_flag() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("gifstudio-setup"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn unknown_subcommand_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("gifstudio-setup"));
    cmd.arg("frobnicate");
    cmd.assert().failure();
    Ok(())
}

#[test]
fn config_shows_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let project = TempDir::new()?;
    let home = TempDir::new()?;
    setup_cmd(&project, &home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in defaults"))
        .stdout(predicate::str::contains("InstallAllUsers=1"))
        .stdout(predicate::str::contains("yt-dlp"));
    Ok(())
}

#[test]
fn config_layers_project_file_and_env() -> Result<(), Box<dyn std::error::Error>> {
    let project = TempDir::new()?;
    let home = TempDir::new()?;
    fs::write(
        project.path().join("gifstudio-setup.yml"),
        "interpreter:\n  version: '3.11.9'\n",
    )?;

    setup_cmd(&project, &home)
        .args(["config", "--json"])
        .env("GIFSTUDIO_PYTHON", "py")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\": \"3.11.9\""))
        .stdout(predicate::str::contains("\"command\": \"py\""));
    Ok(())
}

#[test]
fn user_config_is_overridden_by_project_config() -> Result<(), Box<dyn std::error::Error>> {
    let project = TempDir::new()?;
    let home = TempDir::new()?;
    let user_dir = home.path().join(".gifstudio");
    fs::create_dir_all(&user_dir)?;
    fs::write(
        user_dir.join("setup.yml"),
        "interpreter:\n  version: '3.10.11'\n  command: python3\n",
    )?;
    fs::write(
        project.path().join("gifstudio-setup.yml"),
        "interpreter:\n  version: '3.11.9'\n",
    )?;

    setup_cmd(&project, &home)
        .args(["config", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\": \"3.11.9\""))
        .stdout(predicate::str::contains("\"command\": \"python3\""));
    Ok(())
}

#[test]
fn config_schema() -> Result<(), Box<dyn std::error::Error>> {
    let project = TempDir::new()?;
    let home = TempDir::new()?;
    setup_cmd(&project, &home)
        .args(["config", "--schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SetupConfig"));
    Ok(())
}

#[test]
fn invalid_config_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let project = TempDir::new()?;
    let home = TempDir::new()?;
    fs::write(
        project.path().join("gifstudio-setup.yml"),
        "interpreter:\n  installer_url: 'http://insecure.example.com/py.exe'\n",
    )?;

    setup_cmd(&project, &home)
        .arg("config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));
    Ok(())
}

#[test]
fn missing_explicit_config_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let project = TempDir::new()?;
    let home = TempDir::new()?;
    setup_cmd(&project, &home)
        .args(["doctor", "--config", "nope.yml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("gifstudio-setup"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("gifstudio-setup"));
    Ok(())
}
