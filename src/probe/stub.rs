//! Deterministic probes for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{Probe, ProbeVerdict};

/// What a [`StubProbe`] does when invoked.
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Found for these identifiers, NotFound for anything else.
    FoundFor(Vec<String>),
    /// Found for every identifier.
    AlwaysFound,
    /// NotFound for every identifier.
    NeverFound,
    /// Indeterminate for every identifier.
    Indeterminate,
    /// Panic inside the probe.
    Panic,
    /// Never resolve (relies on the scheduler timeout).
    Hang,
}

/// Probe returning canned verdicts after an optional delay,
/// counting every invocation.
pub struct StubProbe {
    behavior: StubBehavior,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    seen: Arc<std::sync::Mutex<Vec<String>>>,
}

impl StubProbe {
    pub fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn found_for(ids: &[&str]) -> Self {
        Self::new(StubBehavior::FoundFor(
            ids.iter().map(|s| s.to_string()).collect(),
        ))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Shared invocation counter.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// Highest number of concurrent invocations observed.
    pub fn peak(&self) -> Arc<AtomicUsize> {
        self.peak.clone()
    }

    /// Shared log of identifiers this probe was called with.
    pub fn seen(&self) -> Arc<std::sync::Mutex<Vec<String>>> {
        self.seen.clone()
    }
}

#[async_trait]
impl Probe for StubProbe {
    async fn probe(&self, identifier: &str) -> ProbeVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("stub log poisoned")
            .push(identifier.to_string());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.behavior {
            StubBehavior::FoundFor(ids) if ids.iter().any(|id| id == identifier) => {
                ProbeVerdict::found(format!("https://stub.test/{}", identifier))
            }
            StubBehavior::FoundFor(_) | StubBehavior::NeverFound => ProbeVerdict::not_found(),
            StubBehavior::AlwaysFound => {
                ProbeVerdict::found(format!("https://stub.test/{}", identifier))
            }
            StubBehavior::Indeterminate => ProbeVerdict::indeterminate("stub"),
            StubBehavior::Panic => panic!("stub probe exploded"),
            StubBehavior::Hang => {
                futures::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}
