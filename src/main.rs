//! Footprint Relay Server
//!
//! An HTTP service that looks for the public footprint of an identifier
//! (username, email address or phone number) across many platforms:
//!
//! 1. **Planning**: `searchType` expands into an ordered list of
//!    sub-searches (username, email, phone, cross-reference).
//!
//! 2. **Fan-out**: each sub-search probes many platforms concurrently,
//!    bounded by a per-dispatch ceiling, a process-wide limiter and a
//!    per-probe timeout.
//!
//! 3. **Aggregation**: findings are concatenated in plan order into one
//!    response.
//!
//! A probe that errors or times out is reported as indeterminate, never as
//! a failed request.

mod api;
mod error;
mod probe;
mod registry;
mod search;
mod state;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::{AppState, SearchConfig, DEFAULT_EMAIL_PLATFORMS};

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "footprint-relay", version, about = "Digital footprint search server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "PORT")]
    port: u16,

    /// Per-probe timeout in seconds
    #[arg(long, default_value_t = 10, env = "PROBE_TIMEOUT_SECS")]
    probe_timeout_secs: u64,

    /// Probes in flight per sub-search dispatch
    #[arg(long, default_value_t = 40, env = "SUBSEARCH_CONCURRENCY")]
    subsearch_concurrency: usize,

    /// Probes in flight across the whole process
    #[arg(long, default_value_t = 128, env = "GLOBAL_CONCURRENCY")]
    global_concurrency: usize,

    /// Username variants searched by cross-reference
    #[arg(long, default_value_t = 5, env = "VARIANT_CAP")]
    variant_cap: usize,

    /// Platforms checked with the username part of an email (comma-separated)
    #[arg(long, env = "EMAIL_PLATFORMS", value_delimiter = ',')]
    email_platforms: Vec<String>,

    /// Run the sub-searches of a comprehensive search concurrently
    #[arg(long, env = "PARALLEL_SUBSEARCHES")]
    parallel_subsearches: bool,

    /// User agent sent with probe requests
    #[arg(long, env = "USER_AGENT")]
    user_agent: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

impl Args {
    fn into_config(self) -> SearchConfig {
        let defaults = SearchConfig::default();

        let email_platforms: Vec<String> = self
            .email_platforms
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        SearchConfig {
            port: self.port,
            probe_timeout_secs: self.probe_timeout_secs,
            subsearch_concurrency: self.subsearch_concurrency,
            global_concurrency: self.global_concurrency,
            variant_cap: self.variant_cap,
            email_platforms: if email_platforms.is_empty() {
                DEFAULT_EMAIL_PLATFORMS.iter().map(|s| s.to_string()).collect()
            } else {
                email_platforms
            },
            parallel_subsearches: self.parallel_subsearches,
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        }
        .normalized()
    }
}

// ── Entry Point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "footprint_relay=info,tower_http=info".into());
    if args.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = args.into_config();
    let port = config.port;

    let state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            std::process::exit(1);
        }
    };

    if state.registry.is_empty() {
        tracing::warn!("Probe registry is empty; searches will only return link suggestions");
    }

    tracing::info!(
        platforms = state.registry.len(),
        global_concurrency = state.config.global_concurrency,
        subsearch_concurrency = state.config.subsearch_concurrency,
        probe_timeout_secs = state.config.probe_timeout_secs,
        "Probe registry loaded"
    );

    let app = app(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Footprint relay server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

/// Build the router.
fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/search", post(api::search))
        .route("/check/:platform/:identifier", get(api::check_platform))
        .route("/platforms", get(api::list_platforms))
        .route("/health", get(api::health))
        .route("/stats", get(api::stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
