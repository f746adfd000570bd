//! Query classification and planning.
//!
//! `searchType` maps to an ordered list of sub-searches. Unknown types
//! produce an empty plan: the request still succeeds, with zero results.

use std::fmt;

/// One unit of work within a search plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Username,
    Email,
    Phone,
    CrossRef,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Username => "username",
            SearchKind::Email => "email",
            SearchKind::Phone => "phone",
            SearchKind::CrossRef => "crossref",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "username" => Some(SearchKind::Username),
            "email" => Some(SearchKind::Email),
            "phone" => Some(SearchKind::Phone),
            "crossref" => Some(SearchKind::CrossRef),
            _ => None,
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Search type expanding to every sub-search.
pub const COMPREHENSIVE: &str = "comprehensive";

/// Execution order of a comprehensive search.
pub const COMPREHENSIVE_ORDER: [SearchKind; 4] = [
    SearchKind::Username,
    SearchKind::Email,
    SearchKind::Phone,
    SearchKind::CrossRef,
];

/// Ordered sub-searches for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPlan(Vec<SearchKind>);

impl SearchPlan {
    pub fn kinds(&self) -> &[SearchKind] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Build the plan for a `searchType` value.
pub fn plan(search_type: &str) -> SearchPlan {
    if search_type == COMPREHENSIVE {
        return SearchPlan(COMPREHENSIVE_ORDER.to_vec());
    }
    SearchPlan(SearchKind::parse(search_type).into_iter().collect())
}
