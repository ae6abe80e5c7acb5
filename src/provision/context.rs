//! Collaborators shared by the provisioning flows.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::SetupConfig;
use crate::environment::{default_source, EnvironmentSource};
use crate::error::Result;
use crate::shell::{is_elevated, CommandRunner, SystemRunner};

use super::download::{Downloader, HttpDownloader};

/// Everything a flow needs from the outside world.
///
/// Tests build one from fakes; production code borrows one from
/// [`SystemServices`].
pub struct ProvisionContext<'a> {
    /// Runs programs.
    pub runner: &'a dyn CommandRunner,
    /// Fetches the installer.
    pub downloader: &'a dyn Downloader,
    /// Persisted search-path values.
    pub env_source: &'a dyn EnvironmentSource,
    /// Reports whether the process is elevated.
    pub is_elevated: &'a dyn Fn() -> bool,
    /// Directory for the temporary installer.
    pub temp_dir: PathBuf,
}

/// Real implementations of the provisioning collaborators.
pub struct SystemServices {
    runner: SystemRunner,
    downloader: HttpDownloader,
    env_source: Box<dyn EnvironmentSource>,
}

impl SystemServices {
    /// Build the production services for `config`.
    ///
    /// `echo` streams child output to the terminal.
    pub fn new(config: &SetupConfig, echo: bool) -> Result<Self> {
        let runner = if echo {
            SystemRunner::echoing()
        } else {
            SystemRunner::quiet()
        };
        let downloader =
            HttpDownloader::new(Duration::from_secs(config.interpreter.download_timeout_secs))?;

        Ok(Self {
            runner,
            downloader,
            env_source: default_source(),
        })
    }

    /// Borrow a context for one flow.
    pub fn context(&self) -> ProvisionContext<'_> {
        ProvisionContext {
            runner: &self.runner,
            downloader: &self.downloader,
            env_source: &*self.env_source,
            is_elevated: &is_elevated,
            temp_dir: std::env::temp_dir(),
        }
    }
}
