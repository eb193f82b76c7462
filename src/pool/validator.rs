//! Item Validator Module
//!
//! Classifies candidate URLs as acceptable or rejected based on probed
//! content-type and byte size. Two network round-trips per candidate
//! (HEAD for the content-type, full GET for the size) - conservative on
//! purpose, since the size ceiling matters more than probe cost.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

// == Verdict ==
/// Outcome of validating one candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The URL points at an image within the size ceiling
    Accepted,
    /// The URL must not enter the pool
    Rejected(RejectReason),
}

/// Why a candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Content-type carried no image marker
    NotImage(String),
    /// Measured size exceeded the ceiling
    TooLarge(usize),
    /// A probe failed; the candidate is skipped, never fatal
    Probe(String),
}

// == Url Probe ==
/// Network probe for candidate URLs.
///
/// Split out as a trait so the validator can be exercised without a
/// network in tests.
#[async_trait]
pub trait UrlProbe: Send + Sync {
    /// Returns the content-type reported for the URL.
    async fn content_type(&self, url: &str) -> anyhow::Result<String>;

    /// Fetches the full body and returns its size in bytes.
    async fn content_length(&self, url: &str) -> anyhow::Result<usize>;
}

/// Probe backed by a shared reqwest client.
///
/// The client is expected to carry a bounded timeout; an unbounded probe
/// would stall the whole populate pass.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UrlProbe for HttpProbe {
    async fn content_type(&self, url: &str) -> anyhow::Result<String> {
        let resp = self.client.head(url).send().await?;
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Ok(content_type)
    }

    async fn content_length(&self, url: &str) -> anyhow::Result<usize> {
        // Measure the actual body rather than trusting a Content-Length
        // header the host may omit or misreport.
        let bytes = self.client.get(url).send().await?.bytes().await?;
        Ok(bytes.len())
    }
}

// == Item Validator ==
/// Validates candidate URLs against content-type and size constraints.
pub struct ItemValidator {
    probe: Arc<dyn UrlProbe>,
    max_bytes: usize,
}

impl ItemValidator {
    /// Creates a validator with the given probe and size ceiling in bytes.
    pub fn new(probe: Arc<dyn UrlProbe>, max_bytes: usize) -> Self {
        Self { probe, max_bytes }
    }

    /// Classifies one candidate URL.
    ///
    /// Accepted iff the probed content-type contains an image marker and
    /// the measured size is within the ceiling. Any probe failure yields
    /// `Rejected(Probe)` - a single bad candidate must never abort
    /// population of the rest of the pool.
    pub async fn validate(&self, url: &str) -> Verdict {
        let content_type = match self.probe.content_type(url).await {
            Ok(ct) => ct,
            Err(e) => {
                debug!(url, error = %e, "content-type probe failed");
                return Verdict::Rejected(RejectReason::Probe(e.to_string()));
            }
        };

        if !content_type.contains("image") {
            return Verdict::Rejected(RejectReason::NotImage(content_type));
        }

        let size = match self.probe.content_length(url).await {
            Ok(size) => size,
            Err(e) => {
                debug!(url, error = %e, "size probe failed");
                return Verdict::Rejected(RejectReason::Probe(e.to_string()));
            }
        };

        if size > self.max_bytes {
            return Verdict::Rejected(RejectReason::TooLarge(size));
        }

        Verdict::Accepted
    }
}
