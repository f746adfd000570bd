//! Cross-reference sub-search.
//!
//! Produces link suggestions rather than verified findings: search-engine
//! queries for the raw text, username variants, and a breach-database link
//! for anything that looks like an email address.

use super::scheduler::FanOutScheduler;
use super::types::{Confidence, IdentifierType, ProbeOutcome};
use super::variants;
use crate::error::Result;

const SEARCH_ENGINE_PLATFORM: &str = "Google Search";
const SEARCH_ENGINE_URL: &str = "https://www.google.com/search?q=";

const BREACH_PLATFORM: &str = "Breach Database";
const BREACH_URL: &str = "https://haveibeenpwned.com/unifiedsearch/";

/// Search-engine terms built around the exact phrase.
pub fn search_terms(query: &str) -> Vec<String> {
    let phrase = format!("\"{}\"", query);
    vec![
        phrase.clone(),
        format!("{} site:linkedin.com", phrase),
        format!("{} site:facebook.com", phrase),
        format!("{} site:twitter.com", phrase),
        format!("{} filetype:pdf", phrase),
        format!("{} site:github.com", phrase),
    ]
}

/// One link suggestion per search term.
pub fn search_engine_links(query: &str) -> Vec<ProbeOutcome> {
    search_terms(query)
        .into_iter()
        .map(|term| {
            ProbeOutcome::new(
                SEARCH_ENGINE_PLATFORM,
                IdentifierType::SearchResult,
                format!("{}{}", SEARCH_ENGINE_URL, urlencoding::encode(&term)),
                format!("Google search: {}", term),
                Confidence::Medium,
            )
        })
        .collect()
}

/// Breach-database link, only for queries containing `@`.
pub fn breach_link(query: &str) -> Option<ProbeOutcome> {
    query.contains('@').then(|| {
        ProbeOutcome::new(
            BREACH_PLATFORM,
            IdentifierType::Security,
            format!("{}{}", BREACH_URL, urlencoding::encode(query)),
            "Check for data breaches",
            Confidence::High,
        )
    })
}

/// Search links, then variant findings, then the breach link.
pub async fn search_crossref(
    scheduler: &FanOutScheduler,
    query: &str,
    variant_cap: usize,
) -> Result<Vec<ProbeOutcome>> {
    let mut results = search_engine_links(query);
    results.extend(variants::expand(scheduler, query, variant_cap).await?);
    results.extend(breach_link(query));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::probe::stub::{StubBehavior, StubProbe};
    use crate::registry::{Platform, ProbeRegistry};
    use crate::search::scheduler::tests::scheduler_for;

    #[test]
    fn test_search_engine_links() {
        let links = search_engine_links("jane doe");
        assert_eq!(links.len(), 6);
        assert!(links.iter().all(|l| l.confidence == Confidence::Medium));
        assert!(links
            .iter()
            .all(|l| l.identifier_type == IdentifierType::SearchResult));
        assert_eq!(
            links[0].url,
            "https://www.google.com/search?q=%22jane%20doe%22"
        );
        assert_eq!(links[0].info, "Google search: \"jane doe\"");
        assert_eq!(links[4].info, "Google search: \"jane doe\" filetype:pdf");
    }

    #[test]
    fn test_breach_link_only_for_email_like_queries() {
        assert!(breach_link("janedoe").is_none());

        let link = breach_link("jane@example.com").unwrap();
        assert_eq!(link.platform, "Breach Database");
        assert_eq!(link.identifier_type, IdentifierType::Security);
        assert_eq!(link.confidence, Confidence::High);
        assert_eq!(
            link.url,
            "https://haveibeenpwned.com/unifiedsearch/jane%40example.com"
        );
    }

    #[tokio::test]
    async fn test_crossref_result_layout() {
        let registry = ProbeRegistry::builder()
            .register(Platform::new(
                "github",
                Arc::new(StubProbe::new(StubBehavior::AlwaysFound)),
            ))
            .build();
        let scheduler = scheduler_for(registry);

        let results = search_crossref(&scheduler, "jane@example.com", 5)
            .await
            .unwrap();

        // 6 search links, then variants, then the breach link last.
        assert!(results.len() > 7);
        assert!(results[..6]
            .iter()
            .all(|r| r.platform == "Google Search"));
        assert!(results[6..results.len() - 1]
            .iter()
            .all(|r| r.confidence == Confidence::Low));
        assert_eq!(results.last().unwrap().platform, "Breach Database");
    }
}
