//! Server state management.
//!
//! Holds the configuration, the immutable probe registry, the search engine
//! and the cumulative probe counters. Everything is shared behind `Arc`s;
//! the counters are atomics, so no locks are taken on the request path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;

use crate::probe::{build_http_client, AvatarProbe, Probe, ProbeVerdict, DEFAULT_USER_AGENT};
use crate::registry::catalog::{default_registry, telegram_phone_probe};
use crate::registry::ProbeRegistry;
use crate::search::SearchEngine;

/// Default per-probe timeout in seconds.
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Default number of probes in flight for one sub-search dispatch.
const DEFAULT_SUBSEARCH_CONCURRENCY: usize = 40;

/// Default number of outbound probes in flight across the whole process.
const DEFAULT_GLOBAL_CONCURRENCY: usize = 128;

/// Default number of username variants tried by cross-reference search.
const DEFAULT_VARIANT_CAP: usize = 5;

/// Code-hosting platforms checked with the username derived from an email.
pub const DEFAULT_EMAIL_PLATFORMS: &[&str] = &["github", "gitlab"];

/// Server configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub port: u16,
    pub probe_timeout_secs: u64,
    /// Probes in flight per sub-search dispatch.
    pub subsearch_concurrency: usize,
    /// Probes in flight across all requests.
    pub global_concurrency: usize,
    pub variant_cap: usize,
    pub email_platforms: Vec<String>,
    /// Run the sub-searches of one plan concurrently instead of in order.
    pub parallel_subsearches: bool,
    pub user_agent: String,
}

impl SearchConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Clamp values that would disable probing or fail limiter construction.
    pub fn normalized(mut self) -> Self {
        if self.probe_timeout_secs == 0 {
            tracing::warn!("probe timeout of 0s would fail every probe; using 1s");
            self.probe_timeout_secs = 1;
        }

        let global = self.global_concurrency.clamp(1, Semaphore::MAX_PERMITS);
        if global != self.global_concurrency {
            tracing::warn!(
                requested = self.global_concurrency,
                using = global,
                "Global concurrency out of range"
            );
            self.global_concurrency = global;
        }

        if self.subsearch_concurrency == 0 {
            tracing::warn!("Sub-search concurrency of 0 would stall dispatch; using 1");
            self.subsearch_concurrency = 1;
        }
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            subsearch_concurrency: DEFAULT_SUBSEARCH_CONCURRENCY,
            global_concurrency: DEFAULT_GLOBAL_CONCURRENCY,
            variant_cap: DEFAULT_VARIANT_CAP,
            email_platforms: DEFAULT_EMAIL_PLATFORMS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            parallel_subsearches: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Cumulative counters, exposed on `/stats`.
///
/// Indeterminate verdicts are counted separately from NotFound even though
/// both are reported to callers as non-findings.
#[derive(Debug)]
pub struct SearchStats {
    searches: AtomicU64,
    probes_dispatched: AtomicU64,
    found: AtomicU64,
    not_found: AtomicU64,
    indeterminate: AtomicU64,
    subsearch_failures: AtomicU64,
    started_at: DateTime<Utc>,
}

/// Point-in-time copy of [`SearchStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub searches: u64,
    pub probes_dispatched: u64,
    pub found: u64,
    pub not_found: u64,
    pub indeterminate: u64,
    pub subsearch_failures: u64,
    pub started_at: DateTime<Utc>,
}

impl Default for SearchStats {
    fn default() -> Self {
        Self {
            searches: AtomicU64::new(0),
            probes_dispatched: AtomicU64::new(0),
            found: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
            indeterminate: AtomicU64::new(0),
            subsearch_failures: AtomicU64::new(0),
            started_at: Utc::now(),
        }
    }
}

impl SearchStats {
    pub fn record_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_subsearch_failure(&self) {
        self.subsearch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verdict(&self, verdict: &ProbeVerdict) {
        self.probes_dispatched.fetch_add(1, Ordering::Relaxed);
        let counter = match verdict {
            ProbeVerdict::Found { .. } => &self.found,
            ProbeVerdict::NotFound { .. } => &self.not_found,
            ProbeVerdict::Indeterminate { .. } => &self.indeterminate,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            searches: self.searches.load(Ordering::Relaxed),
            probes_dispatched: self.probes_dispatched.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            indeterminate: self.indeterminate.load(Ordering::Relaxed),
            subsearch_failures: self.subsearch_failures.load(Ordering::Relaxed),
            started_at: self.started_at,
        }
    }
}

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    pub config: SearchConfig,
    pub registry: Arc<ProbeRegistry>,
    pub engine: SearchEngine,
    pub stats: Arc<SearchStats>,
}

impl AppState {
    /// Wire up state from explicit collaborators (used by tests with stub
    /// registries and probes).
    pub fn new(
        config: SearchConfig,
        registry: ProbeRegistry,
        avatar_probe: Arc<dyn Probe>,
        phone_probe: Arc<dyn Probe>,
    ) -> Self {
        let config = config.normalized();
        let registry = Arc::new(registry);
        let stats = Arc::new(SearchStats::default());
        let engine = SearchEngine::new(
            &config,
            registry.clone(),
            avatar_probe,
            phone_probe,
            stats.clone(),
        );
        Self {
            config,
            registry,
            engine,
            stats,
        }
    }

    /// Build state with the built-in catalog and live HTTP probes.
    pub fn from_config(config: SearchConfig) -> reqwest::Result<Self> {
        let client = build_http_client(&config.user_agent, config.probe_timeout())?;
        let registry = default_registry(&client);
        let avatar_probe: Arc<dyn Probe> = Arc::new(AvatarProbe::new(client.clone()));
        let phone_probe = telegram_phone_probe(&client);
        Ok(Self::new(config, registry, avatar_probe, phone_probe))
    }
}
