//! Email sub-search.
//!
//! Two signals: the avatar service (keyed on the address itself) and the
//! local part re-used as a username on a few code-hosting platforms.

use std::sync::Arc;

use super::scheduler::FanOutScheduler;
use super::types::{Confidence, IdentifierType, ProbeOutcome};
use crate::error::Result;
use crate::probe::{Probe, ProbeVerdict};

const AVATAR_PLATFORM: &str = "Gravatar";

/// Text before the first `@` (the whole input when there is none).
pub fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or_default()
}

pub async fn search_email(
    scheduler: &FanOutScheduler,
    avatar_probe: Arc<dyn Probe>,
    derived_platforms: &[String],
    email: &str,
) -> Result<Vec<ProbeOutcome>> {
    let mut results = Vec::new();

    if let ProbeVerdict::Found { evidence_url } = scheduler.probe_one(avatar_probe, email).await? {
        results.push(ProbeOutcome::new(
            AVATAR_PLATFORM,
            IdentifierType::Email,
            evidence_url,
            "Email registered with Gravatar",
            Confidence::High,
        ));
    }

    let username = local_part(email).trim();
    if username.is_empty() {
        return Ok(results);
    }

    let registry = scheduler.registry();
    let resolved = scheduler.dispatch_subset(derived_platforms, username).await?;
    results.extend(resolved.into_iter().filter(|r| r.verdict.is_found()).map(|r| {
        let label = r.platform.label();
        ProbeOutcome::new(
            label,
            IdentifierType::EmailDerived,
            registry.canonical_url(&r.platform.name, username),
            format!("Username from email found on {}", label),
            Confidence::Medium,
        )
    }));

    Ok(results)
}
