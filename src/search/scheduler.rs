//! Fan-out scheduler.
//!
//! Runs many probes for one identifier and joins on all of them before
//! returning. Each probe:
//!
//! 1. waits for a permit from the process-wide outbound limiter,
//! 2. runs in its own task (a panic stays inside that task),
//! 3. is bounded by the per-probe timeout.
//!
//! At most `per_dispatch` probes of one dispatch are in flight at a time.
//! Results are yielded in the order the platforms were given, never in
//! completion order, so output is reproducible regardless of latency.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;

use super::types::{Confidence, IdentifierType, ProbeOutcome};
use crate::error::{Result, SearchError};
use crate::probe::{Probe, ProbeVerdict};
use crate::registry::{Platform, ProbeRegistry};
use crate::state::SearchStats;

/// Info text attached to direct username findings.
pub const USERNAME_FOUND_INFO: &str = "Active profile found";

/// A platform together with the verdict its probe produced.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub platform: Arc<Platform>,
    pub verdict: ProbeVerdict,
}

#[derive(Clone)]
pub struct FanOutScheduler {
    registry: Arc<ProbeRegistry>,
    limiter: Arc<Semaphore>,
    per_dispatch: usize,
    probe_timeout: Duration,
    stats: Arc<SearchStats>,
}

impl FanOutScheduler {
    pub fn new(
        registry: Arc<ProbeRegistry>,
        global_concurrency: usize,
        per_dispatch: usize,
        probe_timeout: Duration,
        stats: Arc<SearchStats>,
    ) -> Self {
        Self {
            registry,
            limiter: Arc::new(Semaphore::new(
                global_concurrency.clamp(1, Semaphore::MAX_PERMITS),
            )),
            per_dispatch: per_dispatch.max(1),
            probe_timeout,
            stats,
        }
    }

    pub fn registry(&self) -> &Arc<ProbeRegistry> {
        &self.registry
    }

    /// The process-wide outbound limiter.
    pub fn limiter(&self) -> &Arc<Semaphore> {
        &self.limiter
    }

    /// Run one probe with limiter, isolation and timeout applied.
    ///
    /// Fails only if the limiter has been closed.
    pub async fn probe_one(&self, probe: Arc<dyn Probe>, identifier: &str) -> Result<ProbeVerdict> {
        let permit = self
            .limiter
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| SearchError::LimiterClosed)?;

        let timeout = self.probe_timeout;
        let identifier = identifier.to_string();
        let task = tokio::spawn(async move {
            let _permit = permit;
            tokio::time::timeout(timeout, probe.probe(&identifier)).await
        });

        let verdict = match task.await {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(_)) => ProbeVerdict::indeterminate(format!("timed out after {:?}", timeout)),
            Err(e) if e.is_panic() => ProbeVerdict::indeterminate("probe panicked"),
            Err(_) => ProbeVerdict::indeterminate("probe task cancelled"),
        };

        self.stats.record_verdict(&verdict);
        Ok(verdict)
    }

    /// Probe every given platform; results follow the input order.
    pub async fn dispatch(
        &self,
        platforms: Vec<Arc<Platform>>,
        identifier: &str,
    ) -> Result<Vec<Resolved>> {
        let scheduler = self.clone();
        let identifier: Arc<str> = Arc::from(identifier);

        let results: Vec<Result<Resolved>> = stream::iter(platforms)
            .map(move |platform| {
                let scheduler = scheduler.clone();
                let identifier = identifier.clone();
                async move {
                    let verdict = scheduler
                        .probe_one(platform.probe.clone(), &identifier)
                        .await?;
                    if let ProbeVerdict::Indeterminate { reason } = &verdict {
                        tracing::debug!(
                            platform = platform.name.as_str(),
                            reason = reason.as_str(),
                            "Probe indeterminate"
                        );
                    }
                    Ok(Resolved { platform, verdict })
                }
            })
            .buffered(self.per_dispatch)
            .collect()
            .await;

        results.into_iter().collect()
    }

    /// Probe the named platforms (in the listed order, unknown names skipped).
    pub async fn dispatch_subset<S: AsRef<str>>(
        &self,
        names: &[S],
        identifier: &str,
    ) -> Result<Vec<Resolved>> {
        self.dispatch(self.registry.subset(names), identifier).await
    }

    /// Username search across the whole registry.
    ///
    /// Only Found verdicts become outcomes, each pointing at the platform's
    /// canonical profile URL.
    pub async fn search_username(&self, identifier: &str) -> Result<Vec<ProbeOutcome>> {
        let resolved = self
            .dispatch(self.registry.platforms().to_vec(), identifier)
            .await?;

        Ok(resolved
            .into_iter()
            .filter(|r| r.verdict.is_found())
            .map(|r| {
                ProbeOutcome::new(
                    r.platform.name.clone(),
                    IdentifierType::Username,
                    self.registry.canonical_url(&r.platform.name, identifier),
                    USERNAME_FOUND_INFO,
                    Confidence::High,
                )
            })
            .collect())
    }
}
