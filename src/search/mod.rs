//! Search orchestration.
//!
//! ```text
//! SearchRequest ──► planner::plan ──► [Username, Email, Phone, CrossRef]
//!                                         │
//!                      each sub-search ───┤──► FanOutScheduler ──► probes
//!                                         │
//!                   aggregate::aggregate ◄┘
//! ```
//!
//! A sub-search that fails (or panics) is logged and contributes nothing;
//! the request as a whole still succeeds.

pub mod aggregate;
pub mod crossref;
pub mod email;
pub mod phone;
pub mod planner;
pub mod scheduler;
pub mod types;
pub mod variants;

use std::sync::Arc;

use futures::future::join_all;
use tracing::Instrument;
use uuid::Uuid;

pub use planner::SearchKind;
pub use scheduler::FanOutScheduler;
pub use types::{AggregateResult, ProbeOutcome, SearchRequest};

use crate::error::{Result, SearchError};
use crate::probe::Probe;
use crate::registry::ProbeRegistry;
use crate::state::{SearchConfig, SearchStats};

#[derive(Clone)]
pub struct SearchEngine {
    scheduler: FanOutScheduler,
    avatar_probe: Arc<dyn Probe>,
    phone_probe: Arc<dyn Probe>,
    email_platforms: Arc<Vec<String>>,
    variant_cap: usize,
    parallel_subsearches: bool,
    stats: Arc<SearchStats>,
}

impl SearchEngine {
    pub fn new(
        config: &SearchConfig,
        registry: Arc<ProbeRegistry>,
        avatar_probe: Arc<dyn Probe>,
        phone_probe: Arc<dyn Probe>,
        stats: Arc<SearchStats>,
    ) -> Self {
        let scheduler = FanOutScheduler::new(
            registry,
            config.global_concurrency,
            config.subsearch_concurrency,
            config.probe_timeout(),
            stats.clone(),
        );
        Self {
            scheduler,
            avatar_probe,
            phone_probe,
            email_platforms: Arc::new(config.email_platforms.clone()),
            variant_cap: config.variant_cap,
            parallel_subsearches: config.parallel_subsearches,
            stats,
        }
    }

    pub fn scheduler(&self) -> &FanOutScheduler {
        &self.scheduler
    }

    /// Run every sub-search in the plan for `search_type` and merge the
    /// findings. Never fails: sub-search errors are contained.
    pub async fn search(&self, query: &str, search_type: &str) -> AggregateResult {
        let search_id = Uuid::new_v4();
        let span = tracing::info_span!("search", %search_id, search_type);

        async move {
            self.stats.record_search();
            let plan = planner::plan(search_type);
            if plan.is_empty() {
                tracing::debug!("No sub-searches for this search type");
            }
            tracing::info!(subsearches = plan.len(), "Search started");

            let outputs: Vec<Vec<ProbeOutcome>> = if self.parallel_subsearches {
                join_all(plan.kinds().iter().map(|&kind| self.run_contained(kind, query))).await
            } else {
                let mut outputs = Vec::with_capacity(plan.len());
                for &kind in plan.kinds() {
                    outputs.push(self.run_contained(kind, query).await);
                }
                outputs
            };

            let result = aggregate::aggregate(query, search_type, outputs);
            tracing::info!(total_results = result.total_results, "Search complete");
            result
        }
        .instrument(span)
        .await
    }

    /// Run one sub-search in its own task; any failure yields no outcomes.
    async fn run_contained(&self, kind: SearchKind, query: &str) -> Vec<ProbeOutcome> {
        let engine = self.clone();
        let query = query.to_string();
        let task = tokio::spawn(
            async move { engine.execute(kind, &query).await }.in_current_span(),
        );

        let result = match task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => Err(SearchError::SubSearchPanicked {
                kind: kind.as_str(),
                reason: e.to_string(),
            }),
            Err(e) => Err(SearchError::Internal(format!("{} task: {}", kind, e))),
        };

        match result {
            Ok(outcomes) => {
                tracing::debug!(subsearch = %kind, found = outcomes.len(), "Sub-search finished");
                outcomes
            }
            Err(e) => {
                tracing::warn!(subsearch = %kind, error = %e, "Sub-search failed");
                self.stats.record_subsearch_failure();
                Vec::new()
            }
        }
    }

    async fn execute(&self, kind: SearchKind, query: &str) -> Result<Vec<ProbeOutcome>> {
        match kind {
            SearchKind::Username => self.scheduler.search_username(query).await,
            SearchKind::Email => {
                email::search_email(
                    &self.scheduler,
                    self.avatar_probe.clone(),
                    &self.email_platforms,
                    query,
                )
                .await
            }
            SearchKind::Phone => {
                phone::search_phone(&self.scheduler, self.phone_probe.clone(), query).await
            }
            SearchKind::CrossRef => {
                crossref::search_crossref(&self.scheduler, query, self.variant_cap).await
            }
        }
    }
}
