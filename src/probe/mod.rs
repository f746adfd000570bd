//! Platform existence probes.
//!
//! A probe answers one question for one platform: does this identifier
//! resolve to a public account? It never fails outward. Network errors,
//! timeouts and unexpected statuses come back as
//! [`ProbeVerdict::Indeterminate`] so a flaky platform cannot abort a search.
//!
//! ## Probe kinds
//!
//! - [`HttpProbe`]: one GET against a check URL plus a [`Detection`] rule
//! - [`AvatarProbe`]: hash-addressed avatar lookup for email addresses
//! - [`UnsupportedProbe`]: platforms without a public lookup

pub mod avatar;
pub mod http;
#[cfg(test)]
pub mod stub;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

pub use avatar::AvatarProbe;
pub use http::{Detection, HttpProbe, MissingPolicy};

/// Browser user agent sent with every probe request.
/// Several target sites reject default client signatures.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Tri-state result of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// The platform confirmed the identifier; carries the URL that proved it.
    Found { evidence_url: String },
    /// The platform reported no such account.
    NotFound { note: Option<String> },
    /// The probe could not tell (network error, timeout, odd status, panic).
    Indeterminate { reason: String },
}

impl ProbeVerdict {
    pub fn found(evidence_url: impl Into<String>) -> Self {
        ProbeVerdict::Found {
            evidence_url: evidence_url.into(),
        }
    }

    pub fn not_found() -> Self {
        ProbeVerdict::NotFound { note: None }
    }

    pub fn indeterminate(reason: impl Into<String>) -> Self {
        ProbeVerdict::Indeterminate {
            reason: reason.into(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ProbeVerdict::Found { .. })
    }

    /// Wire label used by the single-platform check endpoint.
    pub fn kind(&self) -> VerdictKind {
        match self {
            ProbeVerdict::Found { .. } => VerdictKind::Found,
            ProbeVerdict::NotFound { .. } => VerdictKind::NotFound,
            ProbeVerdict::Indeterminate { .. } => VerdictKind::Indeterminate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    Found,
    NotFound,
    Indeterminate,
}

/// A single-platform existence check.
///
/// Implementations must be cheap to share (`Arc<dyn Probe>`) and must not
/// return errors: every failure mode maps to a verdict.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, identifier: &str) -> ProbeVerdict;
}

/// Probe for platforms that offer no public lookup at all.
///
/// Always reports `NotFound` with an explanatory note and issues no request.
#[derive(Debug, Clone)]
pub struct UnsupportedProbe {
    note: &'static str,
}

impl UnsupportedProbe {
    pub fn new(note: &'static str) -> Self {
        Self { note }
    }
}

#[async_trait]
impl Probe for UnsupportedProbe {
    async fn probe(&self, _identifier: &str) -> ProbeVerdict {
        ProbeVerdict::NotFound {
            note: Some(self.note.to_string()),
        }
    }
}

/// Build the shared HTTP client used by every network probe.
///
/// The client-level timeout is a backstop; the scheduler also wraps each
/// probe in its own timeout.
pub fn build_http_client(user_agent: &str, timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
}
