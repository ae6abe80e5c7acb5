//! The downloaded installer as a scoped temporary file.

use std::io::{self, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::TempPath;

use crate::error::{Result, SetupError};

use super::download::Downloader;

/// A downloaded installer that deletes itself.
///
/// The file is removed by [`cleanup`](Self::cleanup) or, failing that, when
/// the value is dropped, so every exit path out of an install leaves the
/// temp directory clean.
#[derive(Debug)]
pub struct InstallerArtifact {
    path: TempPath,
    sha256: String,
    size: u64,
}

impl InstallerArtifact {
    /// Download `url` into a new file under `dir`.
    ///
    /// When `expected_sha256` is given the content must match it; on any
    /// error no file is left behind.
    pub fn download(
        downloader: &dyn Downloader,
        url: &str,
        dir: &Path,
        file_name: &str,
        expected_sha256: Option<&str>,
    ) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("gifstudio-")
            .suffix(&format!("-{}", file_name))
            .tempfile_in(dir)?;

        let (size, sha256) = {
            let mut writer = HashingWriter::new(file.as_file_mut());
            let size = downloader.download(url, &mut writer)?;
            (size, writer.finish())
        };
        file.as_file_mut().flush()?;

        if let Some(expected) = expected_sha256 {
            if !expected.eq_ignore_ascii_case(&sha256) {
                return Err(SetupError::ChecksumMismatch {
                    url: url.to_string(),
                    expected: expected.to_lowercase(),
                    actual: sha256,
                });
            }
        }

        // The handle must be closed before the installer can be executed.
        let path = file.into_temp_path();
        tracing::debug!("Downloaded {} bytes to {}", size, path.display());

        Ok(Self { path, sha256, size })
    }

    /// Location of the installer.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hex SHA-256 of the content.
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Delete the file now, reporting failure.
    pub fn cleanup(self) -> Result<()> {
        tracing::debug!(path = %self.path.display(), "Removing installer");
        self.path.close()?;
        Ok(())
    }
}

struct HashingWriter<W> {
    inner: W,
    hasher: Sha256,
}

impl<W: Write> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::download::FakeDownloader;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    fn sha_of(bytes: &[u8]) -> String {
        hex::encode(Sha256::digest(bytes))
    }

    #[test]
    fn download_writes_file_and_hash() {
        let temp = TempDir::new().unwrap();
        let fake = FakeDownloader::serving("installer");
        let artifact = InstallerArtifact::download(
            &fake,
            "https://example.com/python.exe",
            temp.path(),
            "python.exe",
            None,
        )
        .unwrap();

        assert!(artifact.path().exists());
        assert!(artifact
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("-python.exe"));
        assert_eq!(artifact.size(), 9);
        assert_eq!(artifact.sha256(), sha_of(b"installer"));
        assert_eq!(std::fs::read(artifact.path()).unwrap(), b"installer");
    }

    #[test]
    fn cleanup_removes_file() {
        let temp = TempDir::new().unwrap();
        let fake = FakeDownloader::serving("installer");
        let artifact =
            InstallerArtifact::download(&fake, "https://x/p.exe", temp.path(), "p.exe", None)
                .unwrap();
        let path = artifact.path().to_path_buf();

        artifact.cleanup().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn drop_removes_file() {
        let temp = TempDir::new().unwrap();
        let fake = FakeDownloader::serving("installer");
        {
            let _artifact =
                InstallerArtifact::download(&fake, "https://x/p.exe", temp.path(), "p.exe", None)
                    .unwrap();
            assert_eq!(entries(temp.path()), 1);
        }
        assert_eq!(entries(temp.path()), 0);
    }

    #[test]
    fn failed_download_leaves_nothing() {
        let temp = TempDir::new().unwrap();
        let fake = FakeDownloader::failing("connection reset");
        let err = InstallerArtifact::download(&fake, "https://x/p.exe", temp.path(), "p.exe", None)
            .unwrap_err();

        assert!(matches!(err, SetupError::DownloadFailed { .. }));
        assert_eq!(entries(temp.path()), 0);
    }

    #[test]
    fn checksum_mismatch_leaves_nothing() {
        let temp = TempDir::new().unwrap();
        let fake = FakeDownloader::serving("tampered");
        let expected = sha_of(b"installer");
        let err = InstallerArtifact::download(
            &fake,
            "https://x/p.exe",
            temp.path(),
            "p.exe",
            Some(&expected),
        )
        .unwrap_err();

        assert!(matches!(err, SetupError::ChecksumMismatch { .. }));
        assert_eq!(entries(temp.path()), 0);
    }

    #[test]
    fn checksum_match_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let fake = FakeDownloader::serving("installer");
        let expected = sha_of(b"installer").to_uppercase();
        let artifact = InstallerArtifact::download(
            &fake,
            "https://x/p.exe",
            temp.path(),
            "p.exe",
            Some(&expected),
        );
        assert!(artifact.is_ok());
    }
}
