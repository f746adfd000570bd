//! Hash-addressed avatar lookup for email addresses.
//!
//! Gravatar serves `/avatar/{hash}` for registered addresses and, with
//! `d=404`, a plain 404 for unknown ones. The hash is SHA-256 over the
//! trimmed, lower-cased address.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use sha2::{Digest, Sha256};

use super::{Probe, ProbeVerdict};

/// Default avatar service base URL.
pub const GRAVATAR_BASE_URL: &str = "https://www.gravatar.com";

/// Hash an email address the way the avatar service expects.
pub fn avatar_hash(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Avatar-service existence probe.
#[derive(Debug, Clone)]
pub struct AvatarProbe {
    client: Client,
    base_url: String,
}

impl AvatarProbe {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, GRAVATAR_BASE_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Public avatar URL reported as evidence.
    pub fn avatar_url(&self, email: &str) -> String {
        format!("{}/avatar/{}", self.base_url, avatar_hash(email))
    }
}

#[async_trait]
impl Probe for AvatarProbe {
    async fn probe(&self, email: &str) -> ProbeVerdict {
        let evidence_url = self.avatar_url(email);
        let check_url = format!("{}?d=404", evidence_url);

        match self.client.get(&check_url).send().await {
            Ok(resp) if resp.status().is_success() => ProbeVerdict::found(evidence_url),
            Ok(resp) if resp.status() == StatusCode::NOT_FOUND => ProbeVerdict::not_found(),
            Ok(resp) => {
                ProbeVerdict::indeterminate(format!("unexpected status {}", resp.status()))
            }
            Err(e) => {
                tracing::debug!("Avatar lookup failed: {}", e);
                ProbeVerdict::indeterminate(format!("request failed: {}", e))
            }
        }
    }
}
