//! Metadata-only asset existence checks.
//!
//! The migration never downloads or inspects image bytes; it only asks
//! whether a derived WebP path exists. [`HttpAssetProbe`] asks the host
//! with a `HEAD` request; [`FixedAssetProbe`] answers from a fixed set and
//! backs tests and offline runs.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

/// Default timeout for a single existence probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Probe transport failures.
///
/// An HTTP answer of any status is a result, not an error; only failing to
/// reach the host at all lands here.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The HTTP request failed (network, DNS, TLS, timeout).
    #[error("existence probe failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The probe backend is unavailable. Raised by fixed probes simulating
    /// an outage.
    #[error("probe backend unavailable")]
    Unavailable,
}

/// Asks whether an asset exists at a path, without transferring the asset.
#[async_trait]
pub trait AssetProbe: Send + Sync {
    /// `Ok(true)` iff an asset exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, ProbeError>;
}

// ---------------------------------------------------------------------------
// HTTP probe
// ---------------------------------------------------------------------------

/// Probes asset existence with `HEAD` requests against the host.
pub struct HttpAssetProbe {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAssetProbe {
    /// Create a probe for assets served under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_PROBE_TIMEOUT)
    }

    /// Create a probe with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    /// Absolute URL probed for `path`.
    ///
    /// References that are already absolute URLs are probed as-is; host
    /// paths are joined under the asset base.
    fn probe_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl AssetProbe for HttpAssetProbe {
    async fn exists(&self, path: &str) -> Result<bool, ProbeError> {
        let response = self.client.head(self.probe_url(path)).send().await?;
        // Any non-success answer (404 for missing assets, but also 5xx)
        // means no migrated sibling is available at this path.
        Ok(response.status().is_success())
    }
}

// ---------------------------------------------------------------------------
// Fixed probe
// ---------------------------------------------------------------------------

/// Probe answering from a fixed set of existing paths.
///
/// Counts its calls so tests can assert that non-candidates are never
/// probed. [`FixedAssetProbe::failing`] simulates a transport outage on
/// every call.
#[derive(Debug, Default)]
pub struct FixedAssetProbe {
    existing: HashSet<String>,
    fail_all: bool,
    calls: AtomicUsize,
}

impl FixedAssetProbe {
    /// A probe that reports existence for exactly `paths`.
    pub fn with_existing<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            existing: paths.into_iter().map(Into::into).collect(),
            fail_all: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// A probe that reports nothing as existing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A probe whose every call fails with a transport error.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Number of `exists` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetProbe for FixedAssetProbe {
    async fn exists(&self, path: &str) -> Result<bool, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all {
            return Err(ProbeError::Unavailable);
        }
        Ok(self.existing.contains(path))
    }
}
