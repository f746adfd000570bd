//! Phone sub-search.
//!
//! WhatsApp presence is assumed for any number with at least ten digits.
//! That is a heuristic, not a verification: there is no public lookup.
//! Telegram is probed through its public `+number` link.

use std::sync::Arc;

use super::scheduler::FanOutScheduler;
use super::types::{Confidence, IdentifierType, ProbeOutcome};
use crate::error::Result;
use crate::probe::Probe;

/// Minimum digit count for the WhatsApp presence assumption.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Keep only ASCII digits.
pub fn normalize_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub async fn search_phone(
    scheduler: &FanOutScheduler,
    telegram_probe: Arc<dyn Probe>,
    phone: &str,
) -> Result<Vec<ProbeOutcome>> {
    let digits = normalize_digits(phone);
    let mut results = Vec::new();
    if digits.is_empty() {
        return Ok(results);
    }

    if digits.len() >= MIN_PHONE_DIGITS {
        results.push(ProbeOutcome::new(
            "WhatsApp",
            IdentifierType::Phone,
            format!("https://wa.me/{}", digits),
            "Phone number active on WhatsApp",
            Confidence::High,
        ));
    }

    if scheduler.probe_one(telegram_probe, &digits).await?.is_found() {
        results.push(ProbeOutcome::new(
            "Telegram",
            IdentifierType::Phone,
            format!("https://t.me/+{}", digits),
            "Phone number associated with Telegram",
            Confidence::High,
        ));
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::stub::{StubBehavior, StubProbe};
    use crate::registry::ProbeRegistry;
    use crate::search::scheduler::tests::scheduler_for;

    #[test]
    fn test_normalize_digits() {
        assert_eq!(normalize_digits("+1 (555) 010-9999"), "15550109999");
        assert_eq!(normalize_digits("no digits"), "");
    }

    #[tokio::test]
    async fn test_long_number_assumes_whatsapp() {
        let scheduler = scheduler_for(ProbeRegistry::builder().build());
        let telegram = Arc::new(StubProbe::new(StubBehavior::NeverFound));

        let results = search_phone(&scheduler, telegram, "+1 555 010 9999")
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].platform, "WhatsApp");
        assert_eq!(results[0].url, "https://wa.me/15550109999");
        assert_eq!(results[0].confidence, Confidence::High);
        assert_eq!(results[0].identifier_type, IdentifierType::Phone);
    }

    #[tokio::test]
    async fn test_short_number_skips_whatsapp() {
        let scheduler = scheduler_for(ProbeRegistry::builder().build());
        let telegram = Arc::new(StubProbe::new(StubBehavior::AlwaysFound));

        let results = search_phone(&scheduler, telegram, "555-0109").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].platform, "Telegram");
        assert_eq!(results[0].url, "https://t.me/+5550109");
    }

    #[tokio::test]
    async fn test_no_digits_no_probe() {
        let scheduler = scheduler_for(ProbeRegistry::builder().build());
        let telegram = StubProbe::new(StubBehavior::AlwaysFound);
        let calls = telegram.calls();

        let results = search_phone(&scheduler, Arc::new(telegram), "octocat")
            .await
            .unwrap();
        assert!(results.is_empty());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
