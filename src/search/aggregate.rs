//! Result aggregation.
//!
//! Plain concatenation in plan order. A platform found both directly and
//! through a variant is reported twice; no cross-sub-search deduplication.

use super::types::{AggregateResult, ProbeOutcome};

pub fn aggregate(
    query: &str,
    search_type: &str,
    outputs: impl IntoIterator<Item = Vec<ProbeOutcome>>,
) -> AggregateResult {
    let results: Vec<ProbeOutcome> = outputs.into_iter().flatten().collect();
    AggregateResult {
        success: true,
        total_results: results.len(),
        results,
        search_type: search_type.to_string(),
        query: query.to_string(),
    }
}
