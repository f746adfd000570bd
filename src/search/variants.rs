//! Username variant expansion.
//!
//! Ten lexical variants are generated, but only the first `cap` (5 by
//! default) are searched, since each one costs a full registry fan-out.
//! Findings from variants are always reported at low confidence.

use futures::future::join_all;

use super::scheduler::FanOutScheduler;
use super::types::{Confidence, ProbeOutcome};
use crate::error::{Result, SearchError};

/// All candidate variants, in priority order.
pub fn generate_variants(identifier: &str) -> Vec<String> {
    let squash = |sep: &str| -> String {
        identifier
            .chars()
            .map(|c| if c.is_whitespace() { sep.to_string() } else { c.to_string() })
            .collect()
    };

    vec![
        identifier.to_lowercase(),
        identifier.to_uppercase(),
        format!("{}1", identifier),
        format!("{}2", identifier),
        format!("{}_", identifier),
        format!("_{}", identifier),
        squash(""),
        squash("_"),
        squash("."),
        format!("{}123", identifier),
    ]
}

/// The variants actually searched: the first `cap` candidates, minus any
/// equal to the original and any repeats.
pub fn select_variants(identifier: &str, cap: usize) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    for variant in generate_variants(identifier).into_iter().take(cap) {
        if variant != identifier && !selected.contains(&variant) {
            selected.push(variant);
        }
    }
    selected
}

/// Run a username search for each selected variant and re-tag the findings.
pub async fn expand(
    scheduler: &FanOutScheduler,
    identifier: &str,
    cap: usize,
) -> Result<Vec<ProbeOutcome>> {
    let variants = select_variants(identifier, cap);
    tracing::debug!(count = variants.len(), "Searching username variants");

    let searches = variants.into_iter().map(|variant| {
        let scheduler = scheduler.clone();
        async move {
            let outcomes = scheduler.search_username(&variant).await?;
            Ok::<_, SearchError>(
                outcomes
                    .into_iter()
                    .map(|outcome| retag(outcome, &variant))
                    .collect::<Vec<_>>(),
            )
        }
    });

    let mut results = Vec::new();
    for batch in join_all(searches).await {
        results.extend(batch?);
    }
    Ok(results)
}

fn retag(mut outcome: ProbeOutcome, variant: &str) -> ProbeOutcome {
    outcome.info = format!("Username variation: {}", variant);
    outcome.confidence = outcome.confidence.capped_at(Confidence::Low);
    outcome
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::probe::stub::{StubBehavior, StubProbe};
    use crate::registry::{Platform, ProbeRegistry};
    use crate::search::scheduler::tests::scheduler_for;
    use crate::search::types::IdentifierType;

    #[test]
    fn test_generate_ten_variants_in_order() {
        let variants = generate_variants("John Doe");
        assert_eq!(
            variants,
            vec![
                "john doe",
                "JOHN DOE",
                "John Doe1",
                "John Doe2",
                "John Doe_",
                "_John Doe",
                "JohnDoe",
                "John_Doe",
                "John.Doe",
                "John Doe123",
            ]
        );
    }

    #[test]
    fn test_select_excludes_original() {
        // "bob" lower-cased is "bob" itself, so only four of the first five remain.
        assert_eq!(
            select_variants("bob", 5),
            vec!["BOB", "bob1", "bob2", "bob_"]
        );
    }

    #[test]
    fn test_select_respects_cap() {
        assert_eq!(select_variants("Bob", 5).len(), 5);
        assert_eq!(select_variants("Bob", 2), vec!["bob", "BOB"]);
        assert!(select_variants("Bob", 0).is_empty());
    }

    #[test]
    fn test_select_dedupes() {
        // No letters: lower- and upper-case both equal the original.
        assert_eq!(select_variants("42", 5), vec!["421", "422", "42_"]);
    }

    #[tokio::test]
    async fn test_expand_searches_at_most_cap_variants() {
        let probe = StubProbe::new(StubBehavior::NeverFound);
        let seen = probe.seen();
        let registry = ProbeRegistry::builder()
            .register(Platform::new("github", Arc::new(probe)))
            .build();
        let scheduler = scheduler_for(registry);

        expand(&scheduler, "bob", 5).await.unwrap();

        let seen = seen.lock().unwrap();
        let distinct: HashSet<&String> = seen.iter().collect();
        assert!(distinct.len() <= 5);
        assert_eq!(seen.len(), distinct.len());
        assert!(!seen.iter().any(|v| v == "bob"));
    }

    #[tokio::test]
    async fn test_expand_forces_low_confidence_and_retags() {
        let registry = ProbeRegistry::builder()
            .register(
                Platform::new("github", Arc::new(StubProbe::found_for(&["BOB", "bob2"])))
                    .with_profile_url("https://github.com/{id}"),
            )
            .register(Platform::new("gitlab", Arc::new(StubProbe::found_for(&["bob1"]))))
            .build();
        let scheduler = scheduler_for(registry);

        let outcomes = expand(&scheduler, "bob", 5).await.unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.confidence == Confidence::Low));
        assert!(outcomes
            .iter()
            .all(|o| o.identifier_type == IdentifierType::Username));

        // Variant order: BOB, bob1, bob2
        assert_eq!(outcomes[0].info, "Username variation: BOB");
        assert_eq!(outcomes[0].url, "https://github.com/BOB");
        assert_eq!(outcomes[1].platform, "gitlab");
        assert_eq!(outcomes[1].info, "Username variation: bob1");
        assert_eq!(outcomes[2].info, "Username variation: bob2");
    }
}
