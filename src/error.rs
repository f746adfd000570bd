//! # Error Handling
//!
//! Failures are contained at the narrowest scope that can absorb them:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scope       Failure                            Effect            │
//! ├───────────────────────────────────────────────────────────────────┤
//! │  probe       network error, timeout, panic      Indeterminate     │
//! │  sub-search  LimiterClosed, SubSearchPanicked   zero outcomes     │
//! │  request     MalformedRequest, Internal         HTTP 500          │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Probe failures never become a `SearchError`; they are folded into a
//! [`ProbeVerdict`](crate::probe::ProbeVerdict) inside the probe or the
//! scheduler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Main error type for the search pipeline.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The request body could not be used (bad JSON, missing query).
    #[error("Malformed search request: {0}")]
    MalformedRequest(String),

    /// The outbound limiter was closed while a dispatch waited on it.
    #[error("Outbound probe limiter is closed")]
    LimiterClosed,

    /// A sub-search task panicked or was aborted.
    #[error("Sub-search '{kind}' did not complete: {reason}")]
    SubSearchPanicked { kind: &'static str, reason: String },

    /// No platform with this name is registered.
    #[error("Platform not registered: {0}")]
    NotRegistered(String),

    /// Anything else that escaped the pipeline.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// HTTP status used when this error reaches a handler.
    pub fn status(&self) -> StatusCode {
        match self {
            SearchError::NotRegistered(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            SearchError::NotRegistered(name) => json!({
                "error": format!("Unknown platform: {}", name),
            }),
            other => json!({
                "success": false,
                "error": "Advanced search failed",
                "details": other.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SearchError::MalformedRequest("missing field `query`".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed search request: missing field `query`"
        );

        let err = SearchError::SubSearchPanicked {
            kind: "email",
            reason: "task aborted".to_string(),
        };
        assert!(err.to_string().contains("'email'"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            SearchError::NotRegistered("myspace".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SearchError::LimiterClosed.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            SearchError::MalformedRequest("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
