//! Search wire types.
//!
//! Request and response bodies for `POST /search` and the normalized
//! per-finding [`ProbeOutcome`].

use serde::{Deserialize, Serialize};

/// How much a finding can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Lower the confidence to `ceiling` if it is above it. Never raises.
    pub fn capped_at(self, ceiling: Confidence) -> Confidence {
        self.min(ceiling)
    }
}

/// What kind of identifier produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierType {
    Username,
    Email,
    EmailDerived,
    Phone,
    SearchResult,
    Security,
}

/// A single positive finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    pub platform: String,
    pub identifier_type: IdentifierType,
    /// Always `true`: only positive findings become outcomes.
    pub found: bool,
    pub url: String,
    pub info: String,
    pub confidence: Confidence,
}

impl ProbeOutcome {
    pub fn new(
        platform: impl Into<String>,
        identifier_type: IdentifierType,
        url: impl Into<String>,
        info: impl Into<String>,
        confidence: Confidence,
    ) -> Self {
        Self {
            platform: platform.into(),
            identifier_type,
            found: true,
            url: url.into(),
            info: info.into(),
            confidence,
        }
    }
}

/// Body of `POST /search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    /// Missing or unrecognized values produce an empty plan.
    #[serde(default)]
    pub search_type: String,
}

/// Final response of `POST /search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub success: bool,
    pub total_results: usize,
    pub results: Vec<ProbeOutcome>,
    pub search_type: String,
    pub query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_never_upgrades() {
        assert_eq!(Confidence::High.capped_at(Confidence::Low), Confidence::Low);
        assert_eq!(Confidence::Low.capped_at(Confidence::High), Confidence::Low);
        assert_eq!(
            Confidence::Medium.capped_at(Confidence::Medium),
            Confidence::Medium
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = ProbeOutcome::new(
            "github",
            IdentifierType::EmailDerived,
            "https://github.com/a",
            "Username from email found on github",
            Confidence::Medium,
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["platform"], "github");
        assert_eq!(json["identifierType"], "email_derived");
        assert_eq!(json["found"], true);
        assert_eq!(json["confidence"], "medium");
    }

    #[test]
    fn test_request_deserialization() {
        let request: SearchRequest =
            serde_json::from_str(r#"{"query":"octocat","searchType":"username"}"#).unwrap();
        assert_eq!(request.query, "octocat");
        assert_eq!(request.search_type, "username");

        let request: SearchRequest = serde_json::from_str(r#"{"query":"octocat"}"#).unwrap();
        assert_eq!(request.search_type, "");

        assert!(serde_json::from_str::<SearchRequest>(r#"{"searchType":"email"}"#).is_err());
    }

    #[test]
    fn test_aggregate_serialization() {
        let result = AggregateResult {
            success: true,
            total_results: 0,
            results: vec![],
            search_type: "email".to_string(),
            query: "a@b.com".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalResults"], 0);
        assert_eq!(json["searchType"], "email");
        assert!(json["results"].as_array().unwrap().is_empty());
    }
}
