//! Test support: canned fetchers, scripted probes, and bundle fixtures.
//!
//! Everything here exists so tests can drive the full install pipeline
//! against a temporary root without a network connection, a real vendor
//! page, or an installed client. The module is compiled for unit tests and
//! behind the `test-utils` feature for the integration suite.

pub mod fixtures;

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tracing_subscriber::EnvFilter;

use crate::core::InstallerError;
use crate::fetch::Fetcher;
use crate::version::{InstallState, Version, VersionProbe};

/// Ensures the tracing subscriber is installed at most once per process
static INIT_LOGGING: Once = Once::new();

/// Initializes tracing for tests, once per process.
///
/// Respects `RUST_LOG` when set; otherwise uses `level`, or stays silent
/// when neither is provided.
pub fn init_test_logging(level: Option<tracing::Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

type UnpackFn = Box<dyn Fn(&Path) -> std::io::Result<()> + Send + Sync>;

enum CannedResponse {
    Page(String),
    Archive(UnpackFn),
    Failure(String),
}

#[derive(Default)]
struct MockState {
    responses: Mutex<HashMap<String, CannedResponse>>,
    requests: Mutex<Vec<String>>,
}

/// A [`Fetcher`] that serves canned pages and scripted archive unpacks.
///
/// Clones share state, so a test keeps one handle for assertions while the
/// installer owns another. Every requested URL is recorded in call order,
/// which lets tests assert on the exact fetch sequence. URLs without a
/// stubbed response fail the way a dead link would.
#[derive(Clone, Default)]
pub struct MockFetcher {
    state: Arc<MockState>,
}

impl MockFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for text fetches of `url`.
    pub fn stub_page(&self, url: impl Into<String>, body: impl Into<String>) {
        self.stub(url, CannedResponse::Page(body.into()));
    }

    /// Runs `unpack` against the destination directory for archive fetches
    /// of `url`, standing in for a real download and extraction.
    pub fn stub_archive(
        &self,
        url: impl Into<String>,
        unpack: impl Fn(&Path) -> std::io::Result<()> + Send + Sync + 'static,
    ) {
        self.stub(url, CannedResponse::Archive(Box::new(unpack)));
    }

    /// Fails every fetch of `url` with `reason`.
    pub fn stub_failure(&self, url: impl Into<String>, reason: impl Into<String>) {
        self.stub(url, CannedResponse::Failure(reason.into()));
    }

    /// Every URL requested so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    fn stub(&self, url: impl Into<String>, response: CannedResponse) {
        self.state.responses.lock().unwrap().insert(url.into(), response);
    }

    fn record(&self, url: &str) {
        self.state.requests.lock().unwrap().push(url.to_string());
    }

    fn unpack(&self, url: &str, dest_dir: &Path) -> Result<(), InstallerError> {
        self.record(url);
        let responses = self.state.responses.lock().unwrap();
        match responses.get(url) {
            Some(CannedResponse::Archive(unpack)) => {
                unpack(dest_dir).map_err(|e| fetch_error(url, e.to_string()))
            }
            Some(CannedResponse::Failure(reason)) => Err(fetch_error(url, reason.clone())),
            Some(CannedResponse::Page(_)) => Err(fetch_error(url, "stubbed as a page")),
            None => Err(fetch_error(url, "no canned response")),
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, InstallerError> {
        self.record(url);
        let responses = self.state.responses.lock().unwrap();
        match responses.get(url) {
            Some(CannedResponse::Page(body)) => Ok(body.clone()),
            Some(CannedResponse::Failure(reason)) => Err(fetch_error(url, reason.clone())),
            Some(CannedResponse::Archive(_)) => Err(fetch_error(url, "stubbed as an archive")),
            None => Err(fetch_error(url, "no canned response")),
        }
    }

    async fn fetch_zip(&self, url: &str, dest_dir: &Path) -> Result<(), InstallerError> {
        self.unpack(url, dest_dir)
    }

    async fn fetch_tar_gz(&self, url: &str, dest_dir: &Path) -> Result<(), InstallerError> {
        self.unpack(url, dest_dir)
    }
}

fn fetch_error(url: &str, reason: impl Into<String>) -> InstallerError {
    InstallerError::Fetch {
        url: url.to_string(),
        reason: reason.into(),
    }
}

enum ProbeScript {
    State(InstallState),
    Failure(String),
}

struct FakeProbeState {
    script: ProbeScript,
    probes: AtomicUsize,
}

/// A [`VersionProbe`] that returns a scripted state and counts invocations.
#[derive(Clone)]
pub struct FakeProbe {
    state: Arc<FakeProbeState>,
}

impl FakeProbe {
    /// Reports that no installation is present.
    #[must_use]
    pub fn not_installed() -> Self {
        Self::with_script(ProbeScript::State(InstallState::NotInstalled))
    }

    /// Reports `version` as the installed version.
    #[must_use]
    pub fn installed(version: &str) -> Self {
        Self::with_script(ProbeScript::State(InstallState::Installed(Version::new(
            version,
        ))))
    }

    /// Fails every probe with `reason`.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self::with_script(ProbeScript::Failure(reason.to_string()))
    }

    /// How many times the probe has run.
    #[must_use]
    pub fn probes(&self) -> usize {
        self.state.probes.load(Ordering::SeqCst)
    }

    fn with_script(script: ProbeScript) -> Self {
        Self {
            state: Arc::new(FakeProbeState {
                script,
                probes: AtomicUsize::new(0),
            }),
        }
    }
}

#[async_trait]
impl VersionProbe for FakeProbe {
    async fn installed_state(&self) -> Result<InstallState, InstallerError> {
        self.state.probes.fetch_add(1, Ordering::SeqCst);
        match &self.state.script {
            ProbeScript::State(state) => Ok(state.clone()),
            ProbeScript::Failure(reason) => Err(InstallerError::ProbeFailed {
                reason: reason.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fetcher_records_requests_in_order() {
        let fetcher = MockFetcher::new();
        fetcher.stub_page("https://a", "first");
        fetcher.stub_page("https://b", "second");

        fetcher.fetch_text("https://a").await.unwrap();
        fetcher.fetch_text("https://b").await.unwrap();

        assert_eq!(fetcher.requests(), vec!["https://a", "https://b"]);
    }

    #[tokio::test]
    async fn test_mock_fetcher_fails_unstubbed_urls() {
        let fetcher = MockFetcher::new();
        let err = fetcher.fetch_text("https://nowhere").await.unwrap_err();
        assert!(matches!(err, InstallerError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_fake_probe_counts_invocations() {
        let probe = FakeProbe::installed("9.0.16.1234");
        assert_eq!(probe.probes(), 0);

        let state = probe.installed_state().await.unwrap();
        assert_eq!(state, InstallState::Installed(Version::new("9.0.16.1234")));
        assert_eq!(probe.probes(), 1);
    }
}
