//! Probe registry.
//!
//! An ordered, immutable table of platforms. Built once at startup (see
//! [`catalog::default_registry`]) and shared behind an `Arc`; there is no
//! interior mutability, so concurrent reads need no locking.
//!
//! Registration order is significant: username search reports findings in
//! this order regardless of which probe answered first.

pub mod catalog;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::probe::Probe;

/// Placeholder replaced by the (URL-encoded) identifier.
pub const IDENTIFIER_PLACEHOLDER: &str = "{id}";

/// A URL pattern such as `https://github.com/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// Substitute the identifier into the pattern.
    pub fn render(&self, identifier: &str) -> String {
        self.0
            .replace(IDENTIFIER_PLACEHOLDER, &urlencoding::encode(identifier))
    }
}

/// A registered platform: its name, profile URL pattern and probe.
pub struct Platform {
    pub name: String,
    pub display_name: Option<String>,
    pub profile_url: Option<UrlTemplate>,
    pub probe: Arc<dyn Probe>,
}

impl Platform {
    pub fn new(name: impl Into<String>, probe: Arc<dyn Probe>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            profile_url: None,
            probe,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Human-readable name, falling back to the registry key.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn with_profile_url(mut self, pattern: impl Into<String>) -> Self {
        self.profile_url = Some(UrlTemplate::new(pattern));
        self
    }

    /// Canonical profile URL for an identifier on this platform.
    pub fn canonical_url(&self, identifier: &str) -> String {
        match &self.profile_url {
            Some(template) => template.render(identifier),
            None => fallback_url(&self.name, identifier),
        }
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("profile_url", &self.profile_url)
            .finish_non_exhaustive()
    }
}

/// Generic `https://{platform}.com/{identifier}` pattern for platforms
/// without an explicit template.
pub fn fallback_url(platform: &str, identifier: &str) -> String {
    format!(
        "https://{}.com/{}",
        platform.to_lowercase(),
        urlencoding::encode(identifier)
    )
}

/// Immutable platform table.
#[derive(Debug, Default)]
pub struct ProbeRegistry {
    platforms: Vec<Arc<Platform>>,
    by_name: HashMap<String, usize>,
}

impl ProbeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Look up a platform by name (case-insensitive).
    pub fn lookup(&self, name: &str) -> Option<Arc<Platform>> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&idx| self.platforms[idx].clone())
    }

    /// Canonical profile URL, falling back to the generic pattern when the
    /// platform is unknown or has no template.
    pub fn canonical_url(&self, name: &str, identifier: &str) -> String {
        match self.lookup(name) {
            Some(platform) => platform.canonical_url(identifier),
            None => fallback_url(name, identifier),
        }
    }

    /// All platforms in registration order.
    pub fn platforms(&self) -> &[Arc<Platform>] {
        &self.platforms
    }

    /// Platforms for the given names, in the order the names are listed.
    /// Unknown names are skipped.
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> Vec<Arc<Platform>> {
        names
            .iter()
            .filter_map(|name| {
                let found = self.lookup(name.as_ref());
                if found.is_none() {
                    tracing::debug!(platform = name.as_ref(), "Skipping unregistered platform");
                }
                found
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

/// Collects platforms in order, then freezes them into a [`ProbeRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    platforms: Vec<Platform>,
}

impl RegistryBuilder {
    /// Add a platform. A later registration with the same name replaces the
    /// earlier one but keeps the earlier position.
    pub fn register(mut self, platform: Platform) -> Self {
        let key = platform.name.to_lowercase();
        match self
            .platforms
            .iter()
            .position(|p| p.name.to_lowercase() == key)
        {
            Some(idx) => self.platforms[idx] = platform,
            None => self.platforms.push(platform),
        }
        self
    }

    pub fn build(self) -> ProbeRegistry {
        let platforms: Vec<Arc<Platform>> = self.platforms.into_iter().map(Arc::new).collect();
        let by_name = platforms
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.name.to_lowercase(), idx))
            .collect();
        ProbeRegistry { platforms, by_name }
    }
}
