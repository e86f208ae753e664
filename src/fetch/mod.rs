//! Downloading vendor pages and release archives.
//!
//! All network access in the installer goes through the [`Fetcher`] trait:
//! one method for page markup, two for the archive formats releases ship in.
//! Production code uses [`HttpFetcher`]; tests substitute recording fakes so
//! the whole pipeline runs without a network.
//!
//! # Retry Behavior
//!
//! [`HttpFetcher`] retries transient failures (connection errors, timeouts,
//! server errors) with exponential backoff before giving up. Client errors
//! such as HTTP 404 fail immediately; retrying them cannot help.
//!
//! # Examples
//!
//! ```rust,no_run
//! use plasticup::fetch::{Fetcher, HttpFetcher};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let fetcher = HttpFetcher::new()?;
//!
//! let page = fetcher.fetch_text("https://www.plasticscm.com/download").await?;
//! println!("page is {} bytes", page.len());
//!
//! fetcher
//!     .fetch_zip("https://example.com/clientzip", Path::new("/tmp/plasticupdater"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod archive;

use async_trait::async_trait;
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;

use crate::constants::{
    ARCHIVE_FETCH_TIMEOUT, FETCH_BACKOFF_MAX, FETCH_BACKOFF_START_MS, FETCH_RETRY_ATTEMPTS,
    PAGE_FETCH_TIMEOUT,
};
use crate::core::InstallerError;
use crate::utils::progress::ProgressBar;

/// Retrieves vendor pages and unpacks release archives.
///
/// The two archive methods download and unpack in one step; callers never
/// see archive bytes, only the unpacked tree at the destination.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a page body as text.
    async fn fetch_text(&self, url: &str) -> Result<String, InstallerError>;

    /// Download a ZIP archive and unpack it into `dest_dir`.
    async fn fetch_zip(&self, url: &str, dest_dir: &Path) -> Result<(), InstallerError>;

    /// Download a gzip-compressed tarball and unpack it into `dest_dir`.
    async fn fetch_tar_gz(&self, url: &str, dest_dir: &Path) -> Result<(), InstallerError>;
}

/// A download failure, split by whether another attempt could succeed.
enum DownloadError {
    /// Connection problems, timeouts, server errors
    Transient(String),
    /// Client errors such as 404; retrying cannot help
    Permanent(String),
}

impl DownloadError {
    fn into_reason(self) -> String {
        match self {
            Self::Transient(reason) | Self::Permanent(reason) => reason,
        }
    }
}

/// [`Fetcher`] implementation backed by a shared `reqwest` client.
///
/// Downloads stream to memory with a progress bar sized from the
/// `Content-Length` header (a spinner when the header is absent). Transient
/// failures are retried with exponential backoff.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds the shared HTTP client.
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Downloads `url` fully into memory, retrying transient failures.
    async fn download(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, InstallerError> {
        let backoff = ExponentialBackoff::from_millis(FETCH_BACKOFF_START_MS)
            .max_delay(FETCH_BACKOFF_MAX)
            .factor(2)
            .take(FETCH_RETRY_ATTEMPTS);

        RetryIf::spawn(
            backoff,
            || self.download_once(url, timeout),
            |e: &DownloadError| {
                let transient = matches!(e, DownloadError::Transient(_));
                if transient {
                    tracing::debug!("retrying download of {url} after transient failure");
                }
                transient
            },
        )
        .await
        .map_err(|e| InstallerError::Fetch { url: url.to_string(), reason: e.into_reason() })
    }

    async fn download_once(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, DownloadError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| DownloadError::Transient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = format!("HTTP {status}");
            return if status.is_server_error() {
                Err(DownloadError::Transient(reason))
            } else {
                Err(DownloadError::Permanent(reason))
            };
        }

        let progress = match response.content_length() {
            Some(len) => ProgressBar::new_download(len),
            None => ProgressBar::new_spinner(),
        };
        progress.set_message(url.to_string());

        let mut bytes = Vec::with_capacity(
            usize::try_from(response.content_length().unwrap_or(0)).unwrap_or(0),
        );
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                progress.finish_and_clear();
                DownloadError::Transient(e.to_string())
            })?;
            progress.inc(chunk.len() as u64);
            bytes.extend_from_slice(&chunk);
        }
        progress.finish_and_clear();

        tracing::debug!("downloaded {} bytes from {url}", bytes.len());
        Ok(bytes)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, InstallerError> {
        let bytes = self.download(url, PAGE_FETCH_TIMEOUT).await?;
        String::from_utf8(bytes).map_err(|e| InstallerError::Fetch {
            url: url.to_string(),
            reason: format!("page is not valid UTF-8: {e}"),
        })
    }

    async fn fetch_zip(&self, url: &str, dest_dir: &Path) -> Result<(), InstallerError> {
        let bytes = self.download(url, ARCHIVE_FETCH_TIMEOUT).await?;
        archive::extract_zip(&bytes, dest_dir).map_err(|e| InstallerError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn fetch_tar_gz(&self, url: &str, dest_dir: &Path) -> Result<(), InstallerError> {
        let bytes = self.download(url, ARCHIVE_FETCH_TIMEOUT).await?;
        archive::extract_tar_gz(&bytes, dest_dir).map_err(|e| InstallerError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
