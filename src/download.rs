//! First-use download of the segmentation model
//!
//! When the resolved model file is missing, [`ModelDownloader`] fetches it
//! into the model directory. The bytes land in a temporary file next to the
//! destination, are hashed while they stream in, and are only renamed into
//! place once the transfer (and the checksum, when one is pinned) succeeded.

use crate::error::{BgRemovalError, Result};
use crate::models::{ModelLocation, U2NET_MODEL_FILE};
use instant::{Duration, Instant};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{BufWriter, Write};
use tempfile::NamedTempFile;

/// Release asset the `~/.u2net` convention downloads U²-Net from
pub const U2NET_MODEL_URL: &str =
    "https://github.com/danielgatis/rembg/releases/download/v0.0.0/u2net.onnx";

/// Environment variable pinning the expected SHA-256 of the model file
pub const U2NET_SHA256_ENV: &str = "U2NET_SHA256";

/// Compute a SHA-256 hex digest of the given bytes
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Where a model comes from and what it must hash to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    url: String,
    sha256: Option<String>,
}

impl ModelSource {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            sha256: None,
        }
    }

    /// Require the downloaded file to have this SHA-256 (hex, any case)
    #[must_use]
    pub fn with_sha256<S: Into<String>>(mut self, digest: S) -> Self {
        self.sha256 = Some(digest.into());
        self
    }

    /// The U²-Net release asset, checked against `U2NET_SHA256` when set
    #[must_use]
    pub fn u2net() -> Self {
        let source = Self::new(U2NET_MODEL_URL);
        match std::env::var(U2NET_SHA256_ENV).ok().filter(|v| !v.trim().is_empty()) {
            Some(digest) => source.with_sha256(digest.trim()),
            None => source,
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }
}

/// Transport that streams the body behind a URL into a writer
pub trait ModelFetcher {
    /// Write the full response body for `url` to `dest`, returning its length
    ///
    /// # Errors
    /// - Connection, HTTP status or transfer failures
    fn fetch(&mut self, url: &str, dest: &mut dyn Write) -> Result<u64>;
}

/// Blocking HTTP(S) fetcher built on `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    timeout: Duration,
}

impl HttpFetcher {
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::with_timeout(Duration::from_secs(300))
    }
}

impl ModelFetcher for HttpFetcher {
    fn fetch(&mut self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| BgRemovalError::network_error("Failed to create HTTP client", e))?;

        let mut response = client
            .get(url)
            .send()
            .map_err(|e| BgRemovalError::network_error(format!("Failed to download {url}"), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BgRemovalError::network_error(
                format!("Failed to download {url}"),
                format!("HTTP {status}"),
            ));
        }

        response
            .copy_to(dest)
            .map_err(|e| BgRemovalError::network_error(format!("Failed to read body of {url}"), e))
    }
}

/// Writer that hashes everything passing through it
struct HashingWriter<W: Write> {
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

    fn finish(mut self) -> std::io::Result<String> {
        self.inner.flush()?;
        Ok(format!("{:x}", self.hasher.finalize()))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(buf.get(..written).unwrap_or(&[]));
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Fetches a missing model file into its resolved location
pub struct ModelDownloader {
    source: ModelSource,
    fetcher: Box<dyn ModelFetcher>,
}

impl std::fmt::Debug for ModelDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelDownloader")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl ModelDownloader {
    pub fn new<F: ModelFetcher + 'static>(source: ModelSource, fetcher: F) -> Self {
        Self {
            source,
            fetcher: Box::new(fetcher),
        }
    }

    /// U²-Net over HTTPS
    #[must_use]
    pub fn u2net() -> Self {
        Self::new(ModelSource::u2net(), HttpFetcher::default())
    }

    #[must_use]
    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    /// Make sure the model file exists, downloading it if needed
    ///
    /// Returns `true` when a download happened. An existing file is left
    /// untouched and never re-verified.
    ///
    /// # Errors
    /// - Model directory or temporary file cannot be created
    /// - The transfer fails or returns an empty body
    /// - The body does not match the pinned checksum
    pub fn ensure(&mut self, location: &ModelLocation) -> Result<bool> {
        let path = location.path();
        if path.is_file() {
            return Ok(false);
        }

        let dir = location.directory();
        fs::create_dir_all(dir)
            .map_err(|e| BgRemovalError::file_io_error("create model directory", dir, &e))?;
        let mut temp = NamedTempFile::new_in(dir)
            .map_err(|e| BgRemovalError::file_io_error("create temporary file in", dir, &e))?;

        tracing::info!(
            url = self.source.url(),
            destination = %path.display(),
            "Downloading segmentation model"
        );
        let start = Instant::now();

        let mut writer = HashingWriter::new(BufWriter::new(temp.as_file_mut()));
        let bytes = self.fetcher.fetch(self.source.url(), &mut writer)?;
        let digest = writer
            .finish()
            .map_err(|e| BgRemovalError::file_io_error("write downloaded model", temp.path(), &e))?;

        if bytes == 0 {
            return Err(BgRemovalError::network_error(
                format!("Failed to download {U2NET_MODEL_FILE}"),
                format!("empty response from {}", self.source.url()),
            ));
        }

        if let Some(expected) = self.source.sha256() {
            if !digest.eq_ignore_ascii_case(expected) {
                tracing::warn!(expected, actual = %digest, "Model checksum mismatch");
                return Err(BgRemovalError::model(format!(
                    "Downloaded {U2NET_MODEL_FILE} failed checksum verification: expected {expected}, got {digest}"
                )));
            }
        }

        temp.persist(path)
            .map_err(|e| BgRemovalError::file_io_error("save downloaded model", path, &e.error))?;

        tracing::info!(
            bytes,
            sha256 = %digest,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Segmentation model downloaded"
        );
        Ok(true)
    }
}
