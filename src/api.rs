//! HTTP API endpoints.
//!
//! POST /search                        run a search plan
//! GET  /check/:platform/:identifier   probe one platform
//! GET  /platforms                     list registered platforms
//! GET  /health                        liveness
//! GET  /stats                         cumulative probe counters

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::error::{Result, SearchError};
use crate::probe::{ProbeVerdict, VerdictKind};
use crate::search::{AggregateResult, SearchRequest};
use crate::state::{AppState, StatsSnapshot};

/// Response of the single-platform check.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub platform: String,
    pub identifier: String,
    pub exists: bool,
    pub outcome: VerdictKind,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Cumulative counters plus the limiter's current headroom.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub counters: StatsSnapshot,
    pub outbound_permits_available: usize,
}

#[derive(Debug, Serialize)]
pub struct PlatformInfo {
    pub name: String,
    pub example_url: String,
}

/// Run a search.
///
/// POST /search
/// Body: { "query": "octocat", "searchType": "username" }
pub async fn search(
    State(state): State<AppState>,
    body: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<AggregateResult>> {
    let Json(request) = body.map_err(|e| SearchError::MalformedRequest(e.body_text()))?;

    let result = state
        .engine
        .search(&request.query, &request.search_type)
        .await;
    Ok(Json(result))
}

/// Probe a single platform.
///
/// GET /check/github/octocat
pub async fn check_platform(
    State(state): State<AppState>,
    Path((platform, identifier)): Path<(String, String)>,
) -> Result<Json<CheckResponse>> {
    let scheduler = state.engine.scheduler();
    let entry = scheduler
        .registry()
        .lookup(&platform)
        .ok_or_else(|| SearchError::NotRegistered(platform.clone()))?;

    let verdict = scheduler.probe_one(entry.probe.clone(), &identifier).await?;

    let note = match &verdict {
        ProbeVerdict::Found { .. } => None,
        ProbeVerdict::NotFound { note } => note.clone(),
        ProbeVerdict::Indeterminate { reason } => Some(reason.clone()),
    };

    Ok(Json(CheckResponse {
        platform: entry.name.clone(),
        url: entry.canonical_url(&identifier),
        exists: verdict.is_found(),
        outcome: verdict.kind(),
        note,
        identifier,
    }))
}

/// GET /platforms
pub async fn list_platforms(State(state): State<AppState>) -> impl IntoResponse {
    let platforms: Vec<PlatformInfo> = state
        .registry
        .platforms()
        .iter()
        .map(|p| PlatformInfo {
            name: p.name.clone(),
            example_url: p.canonical_url("username"),
        })
        .collect();

    Json(json!({
        "count": platforms.len(),
        "platforms": platforms,
    }))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "footprint-relay",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatsResponse {
        counters: state.stats.snapshot(),
        outbound_permits_available: state.engine.scheduler().limiter().available_permits(),
    })
}
