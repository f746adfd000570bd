//! Built-in platform catalog.
//!
//! Each entry pairs a check URL and detection rule with the profile URL
//! reported to callers. The detection rules are best-effort page
//! heuristics; they are expected to drift as sites change their markup.
//!
//! ## 404 policy
//!
//! Sites that answer unknown profiles with a real 404 are marked
//! [`MissingPolicy::Authoritative404`]. Sites known to return 404 for
//! block pages, login walls or moved routes (or that serve a 200 error page)
//! use [`MissingPolicy::Indeterminate`].

use std::sync::Arc;

use reqwest::Client;

use super::{Platform, ProbeRegistry};
use crate::probe::{Detection, HttpProbe, MissingPolicy, Probe, UnsupportedProbe};
use crate::registry::UrlTemplate;

use crate::probe::Detection::{AbsentMarker, AnyMarker, JsonField, Status, StatusAndMarker};
use crate::probe::MissingPolicy::{Authoritative404 as A404, Indeterminate as Unsure};

/// How a catalog platform is checked.
#[derive(Debug, Clone, Copy)]
pub enum CheckKind {
    Http {
        check_url: &'static str,
        detection: Detection,
        missing: MissingPolicy,
    },
    /// No public lookup exists.
    Unsupported(&'static str),
}

/// One built-in platform.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    /// Label used in outward-facing text.
    pub display_name: &'static str,
    /// Profile URL pattern; `None` uses `https://{name}.com/{id}`.
    pub profile_url: Option<&'static str>,
    pub check: CheckKind,
}

const fn http(
    name: &'static str,
    display_name: &'static str,
    profile_url: Option<&'static str>,
    check_url: &'static str,
    detection: Detection,
    missing: MissingPolicy,
) -> CatalogEntry {
    CatalogEntry {
        name,
        display_name,
        profile_url,
        check: CheckKind::Http {
            check_url,
            detection,
            missing,
        },
    }
}

/// The default catalog, in search order.
pub const CATALOG: &[CatalogEntry] = &[
    http("github", "GitHub", Some("https://github.com/{id}"), "https://api.github.com/users/{id}", Status, A404),
    http("instagram", "Instagram", Some("https://instagram.com/{id}"), "https://www.instagram.com/{id}/", AnyMarker(&["\"is_private\"", "\"full_name\""]), A404),
    http("tiktok", "TikTok", Some("https://tiktok.com/@{id}"), "https://www.tiktok.com/@{id}", AnyMarker(&["\"statusCode\":0", "\"uniqueId\""]), Unsure),
    http("youtube", "YouTube", Some("https://youtube.com/@{id}"), "https://www.youtube.com/@{id}", AnyMarker(&["\"channelMetadataRenderer\"", "\"subscriberCountText\""]), A404),
    http("twitter", "Twitter", Some("https://twitter.com/{id}"), "https://twitter.com/{id}", AnyMarker(&["\"screen_name\"", "profilePage"]), A404),
    http("linkedin", "LinkedIn", Some("https://linkedin.com/in/{id}"), "https://www.linkedin.com/in/{id}/", AnyMarker(&["\"profile\"", "profileView"]), A404),
    CatalogEntry {
        name: "discord",
        display_name: "Discord",
        profile_url: Some("https://discord.com/users/{id}"),
        check: CheckKind::Unsupported("Discord profiles are not publicly searchable"),
    },
    http("twitch", "Twitch", Some("https://twitch.tv/{id}"), "https://www.twitch.tv/{id}", AnyMarker(&["\"channelLogin\"", "isPartner"]), A404),
    http("reddit", "Reddit", Some("https://reddit.com/u/{id}"), "https://www.reddit.com/user/{id}/about.json", JsonField("/data/name"), A404),
    http("telegram", "Telegram", Some("https://t.me/{id}"), "https://t.me/{id}", AnyMarker(&["tgme_page_title", "tgme_page_description"]), Unsure),
    http("spotify", "Spotify", Some("https://open.spotify.com/user/{id}"), "https://open.spotify.com/user/{id}", AnyMarker(&["\"user\"", "profileHeader"]), A404),
    http("vk", "VK", Some("https://vk.com/{id}"), "https://vk.com/{id}", AnyMarker(&["Profile", "page_info"]), A404),
    http("tumblr", "Tumblr", Some("https://{id}.tumblr.com/"), "https://{id}.tumblr.com/", Status, A404),
    http("deviantart", "DeviantArt", None, "https://www.deviantart.com/{id}", AnyMarker(&["user-profile", "username"]), A404),
    http("behance", "Behance", Some("https://www.behance.net/{id}"), "https://www.behance.net/{id}", StatusAndMarker("profile"), A404),
    http("dribbble", "Dribbble", None, "https://dribbble.com/{id}", Status, A404),
    http("flickr", "Flickr", Some("https://www.flickr.com/people/{id}"), "https://www.flickr.com/people/{id}", Status, A404),
    http("gitlab", "Gitlab", None, "https://gitlab.com/{id}", AnyMarker(&["user-profile", "user-info"]), A404),
    http("bitbucket", "Bitbucket", Some("https://bitbucket.org/{id}/"), "https://bitbucket.org/{id}/", Status, A404),
    http("medium", "Medium", Some("https://medium.com/@{id}"), "https://medium.com/@{id}", Status, A404),
    http("patreon", "Patreon", None, "https://www.patreon.com/{id}", Status, A404),
    http("vimeo", "Vimeo", None, "https://vimeo.com/{id}", Status, A404),
    http("keybase", "Keybase", Some("https://keybase.io/{id}"), "https://keybase.io/{id}", Status, A404),
    http("quora", "Quora", Some("https://www.quora.com/profile/{id}"), "https://www.quora.com/profile/{id}", Status, Unsure),
    http("hackernews", "Hacker News", Some("https://news.ycombinator.com/user?id={id}"), "https://news.ycombinator.com/user?id={id}", AbsentMarker("No such user"), Unsure),
    http("stackoverflow", "Stack Overflow", Some("https://stackoverflow.com/users/{id}"), "https://stackoverflow.com/users/{id}", Status, A404),
    http("lastfm", "Last.fm", Some("https://www.last.fm/user/{id}"), "https://www.last.fm/user/{id}", Status, A404),
    http("mastodon", "Mastodon", Some("https://mastodon.social/@{id}"), "https://mastodon.social/@{id}", Status, A404),
    http("goodreads", "Goodreads", None, "https://www.goodreads.com/{id}", Status, A404),
    http("xing", "XING", Some("https://www.xing.com/profile/{id}"), "https://www.xing.com/profile/{id}", Status, Unsure),
    http("snapchat", "Snapchat", Some("https://www.snapchat.com/add/{id}"), "https://www.snapchat.com/add/{id}", AnyMarker(&["profilePageUsername", "\"username\""]), A404),
    http("pinterest", "Pinterest", None, "https://www.pinterest.com/{id}/", AnyMarker(&["\"username\"", "profileData"]), Unsure),
    http("steam", "Steam", Some("https://steamcommunity.com/id/{id}"), "https://steamcommunity.com/id/{id}", AnyMarker(&["profile_header", "profileData"]), Unsure),
    http("facebook", "Facebook", None, "https://www.facebook.com/{id}", AnyMarker(&["\"profile_id\"", "profileCometRoot"]), Unsure),
    http("soundcloud", "SoundCloud", None, "https://soundcloud.com/{id}", AnyMarker(&["\"username\"", "profileHeader"]), A404),
    http("blogger", "Blogger", Some("https://{id}.blogspot.com/"), "https://{id}.blogspot.com/", Status, A404),
    http("wordpress", "WordPress", Some("https://{id}.wordpress.com/"), "https://{id}.wordpress.com/", Status, A404),
    http("weibo", "Weibo", Some("https://weibo.com/u/{id}"), "https://weibo.com/u/{id}", Status, Unsure),
];

/// Telegram phone-link check, used by the phone sub-search.
pub const TELEGRAM_PHONE_CHECK_URL: &str = "https://t.me/+{id}";

impl CatalogEntry {
    /// Instantiate this entry's probe on the shared client.
    pub fn probe(&self, client: &Client) -> Arc<dyn Probe> {
        match self.check {
            CheckKind::Http {
                check_url,
                detection,
                missing,
            } => Arc::new(HttpProbe::new(
                client.clone(),
                UrlTemplate::new(check_url),
                detection,
                missing,
            )),
            CheckKind::Unsupported(note) => Arc::new(UnsupportedProbe::new(note)),
        }
    }

    fn platform(&self, client: &Client) -> Platform {
        let platform =
            Platform::new(self.name, self.probe(client)).with_display_name(self.display_name);
        match self.profile_url {
            Some(pattern) => platform.with_profile_url(pattern),
            None => platform,
        }
    }
}

/// Build the registry for the full built-in catalog.
pub fn default_registry(client: &Client) -> ProbeRegistry {
    CATALOG
        .iter()
        .fold(ProbeRegistry::builder(), |builder, entry| {
            builder.register(entry.platform(client))
        })
        .build()
}

/// Probe for a phone number's Telegram link.
pub fn telegram_phone_probe(client: &Client) -> Arc<dyn Probe> {
    Arc::new(HttpProbe::new(
        client.clone(),
        UrlTemplate::new(TELEGRAM_PHONE_CHECK_URL),
        Status,
        Unsure,
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::probe::ProbeVerdict;

    #[test]
    fn test_catalog_names_unique_and_lowercase() {
        let mut seen = HashSet::new();
        for entry in CATALOG {
            assert_eq!(entry.name, entry.name.to_lowercase());
            assert!(seen.insert(entry.name), "duplicate entry {}", entry.name);
        }
        assert_eq!(CATALOG.len(), 38);
    }

    #[test]
    fn test_templates_contain_placeholder() {
        for entry in CATALOG {
            if let Some(pattern) = entry.profile_url {
                assert!(pattern.contains("{id}"), "{} profile url", entry.name);
            }
            if let CheckKind::Http { check_url, .. } = entry.check {
                assert!(check_url.starts_with("https://"), "{} check url", entry.name);
                assert!(check_url.contains("{id}"), "{} check url", entry.name);
            }
        }
    }

    #[test]
    fn test_default_registry_preserves_catalog_order() {
        let registry = default_registry(&Client::new());
        let names: Vec<&str> = registry.platforms().iter().map(|p| p.name.as_str()).collect();
        let expected: Vec<&str> = CATALOG.iter().map(|e| e.name).collect();
        assert_eq!(names, expected);
        assert_eq!(names[0], "github");
    }

    #[test]
    fn test_profile_urls() {
        let registry = default_registry(&Client::new());
        assert_eq!(
            registry.canonical_url("github", "octocat"),
            "https://github.com/octocat"
        );
        assert_eq!(
            registry.canonical_url("tumblr", "octocat"),
            "https://octocat.tumblr.com/"
        );
        assert_eq!(
            registry.canonical_url("gitlab", "octocat"),
            "https://gitlab.com/octocat"
        );
        assert_eq!(
            registry.canonical_url("hackernews", "pg"),
            "https://news.ycombinator.com/user?id=pg"
        );
    }

    #[test]
    fn test_display_names() {
        let registry = default_registry(&Client::new());
        assert_eq!(registry.lookup("github").unwrap().label(), "GitHub");
        assert_eq!(registry.lookup("gitlab").unwrap().label(), "Gitlab");
        assert_eq!(registry.lookup("hackernews").unwrap().label(), "Hacker News");
        assert!(CATALOG.iter().all(|e| !e.display_name.is_empty()));
    }

    #[tokio::test]
    async fn test_discord_is_unsupported() {
        let registry = default_registry(&Client::new());
        let discord = registry.lookup("discord").unwrap();
        match discord.probe.probe("anyone").await {
            ProbeVerdict::NotFound { note } => assert!(note.unwrap().contains("Discord")),
            other => panic!("unexpected verdict {:?}", other),
        }
    }
}
