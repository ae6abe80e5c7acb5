//! Installer download.

use std::cell::RefCell;
use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, Context};

use crate::error::{Result, SetupError};

/// Fetches a URL into a writer.
pub trait Downloader {
    /// Stream the body of `url` into `dest`, returning the byte count.
    ///
    /// Transport errors and non-2xx responses are
    /// [`SetupError::DownloadFailed`].
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64>;
}

/// Blocking HTTP(S) downloader.
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

impl HttpDownloader {
    /// Create a downloader with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("gifstudio-setup/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    fn fetch(&self, url: &str, dest: &mut dyn Write) -> anyhow::Result<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {}", response.status()));
        }

        let bytes = response
            .copy_to(dest)
            .context("Failed to read response body")?;
        dest.flush()?;
        Ok(bytes)
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        tracing::debug!("Downloading {}", url);
        self.fetch(url, dest)
            .map_err(|e| SetupError::DownloadFailed {
                url: url.to_string(),
                message: format!("{:#}", e),
            })
    }
}

/// In-memory downloader for tests.
///
/// Serves a fixed body or fails every request, and records requested URLs.
#[derive(Debug)]
pub struct FakeDownloader {
    body: std::result::Result<Vec<u8>, String>,
    requests: RefCell<Vec<String>>,
}

impl FakeDownloader {
    /// Serve `body` for every URL.
    pub fn serving(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: Ok(body.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Fail every request with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            body: Err(message.to_string()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Downloader for FakeDownloader {
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        self.requests.borrow_mut().push(url.to_string());
        match &self.body {
            Ok(body) => {
                dest.write_all(body)?;
                Ok(body.len() as u64)
            }
            Err(message) => Err(SetupError::DownloadFailed {
                url: url.to_string(),
                message: message.clone(),
            }),
        }
    }
}
