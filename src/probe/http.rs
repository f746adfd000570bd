//! Generic HTTP probe.
//!
//! Every catalog platform that can be checked over plain HTTP is one
//! `HttpProbe` value: a check URL, a [`Detection`] rule applied to a 2xx
//! body, and a [`MissingPolicy`] deciding what a 404 means.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::{Probe, ProbeVerdict};
use crate::registry::UrlTemplate;

/// How a successful (2xx) response is turned into a verdict.
#[derive(Debug, Clone, Copy)]
pub enum Detection {
    /// Any 2xx response means the account exists.
    Status,
    /// The body contains at least one of the markers.
    AnyMarker(&'static [&'static str]),
    /// The body contains the marker (2xx already established).
    StatusAndMarker(&'static str),
    /// The body does not contain the marker.
    AbsentMarker(&'static str),
    /// The body is JSON with a non-null, non-empty value at this pointer.
    JsonField(&'static str),
}

impl Detection {
    fn needs_body(&self) -> bool {
        !matches!(self, Detection::Status)
    }

    fn matches(&self, body: &str) -> bool {
        match self {
            Detection::Status => true,
            Detection::AnyMarker(markers) => markers.iter().any(|m| body.contains(m)),
            Detection::StatusAndMarker(marker) => body.contains(marker),
            Detection::AbsentMarker(marker) => !body.contains(marker),
            Detection::JsonField(pointer) => serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|value| value.pointer(pointer).cloned())
                .map(|field| match field {
                    serde_json::Value::Null => false,
                    serde_json::Value::String(s) => !s.is_empty(),
                    _ => true,
                })
                .unwrap_or(false),
        }
    }
}

/// What a 404/410 from the check URL means for a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// The platform reliably answers 404 for unknown accounts.
    Authoritative404,
    /// A 404 may be a block page or a moved route; treat it as unknown.
    Indeterminate,
}

/// One-request existence check against a platform's public pages or API.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    check_url: UrlTemplate,
    detection: Detection,
    missing: MissingPolicy,
}

impl HttpProbe {
    pub fn new(
        client: Client,
        check_url: UrlTemplate,
        detection: Detection,
        missing: MissingPolicy,
    ) -> Self {
        Self {
            client,
            check_url,
            detection,
            missing,
        }
    }

    /// The concrete URL this probe would fetch for an identifier.
    pub fn check_url(&self, identifier: &str) -> String {
        self.check_url.render(identifier)
    }

    /// Map a status code and (optional) body to a verdict.
    fn classify(&self, url: String, status: StatusCode, body: Option<&str>) -> ProbeVerdict {
        if status.is_success() {
            let matched = match body {
                Some(body) => self.detection.matches(body),
                None => !self.detection.needs_body(),
            };
            return if matched {
                ProbeVerdict::found(url)
            } else {
                ProbeVerdict::not_found()
            };
        }

        if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE)
            && self.missing == MissingPolicy::Authoritative404
        {
            return ProbeVerdict::not_found();
        }

        ProbeVerdict::indeterminate(format!("unexpected status {}", status))
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, identifier: &str) -> ProbeVerdict {
        let url = self.check_url(identifier);

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(url = url.as_str(), "Probe request failed: {}", e);
                return ProbeVerdict::indeterminate(if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    format!("request failed: {}", e)
                });
            }
        };

        let status = response.status();
        if !status.is_success() || !self.detection.needs_body() {
            return self.classify(url, status, None);
        }

        match response.text().await {
            Ok(body) => self.classify(url, status, Some(&body)),
            Err(e) => {
                tracing::debug!(url = url.as_str(), "Probe body read failed: {}", e);
                ProbeVerdict::indeterminate(format!("body read failed: {}", e))
            }
        }
    }
}
