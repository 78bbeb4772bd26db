//! HTTP probes against public endpoints.

use std::collections::BTreeMap;
use std::time::Duration;

/// Result of one GET. `status == 0` means no response was received.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
    /// Response headers with lowercase names.
    pub headers: BTreeMap<String, String>,
    pub error: Option<String>,
}

impl ProbeResponse {
    pub fn unreachable(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn reached(&self) -> bool {
        self.status != 0
    }

    /// Case-insensitive substring search over the body.
    pub fn contains(&self, needle: &str) -> bool {
        self.body.to_lowercase().contains(&needle.to_lowercase())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn describe(&self) -> String {
        match &self.error {
            Some(e) if self.status == 0 => format!("unreachable: {e}"),
            _ => format!("HTTP {}", self.status),
        }
    }
}

/// The seam for plain HTTP GETs. Implementations must never panic.
pub trait WebProbe {
    fn get(&self, url: &str) -> ProbeResponse;
}

/// reqwest-backed probe with an optional bearer token.
#[derive(Debug)]
pub struct HttpProbe {
    http: Result<reqwest::blocking::Client, String>,
    token: Option<String>,
}

impl HttpProbe {
    pub fn new(timeout: Duration, token: Option<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(concat!("reelcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e: reqwest::Error| e.to_string());
        if let Err(ref e) = http {
            tracing::error!(error = %e, "web: failed to build HTTP client");
        }
        Self { http, token }
    }
}

impl WebProbe for HttpProbe {
    fn get(&self, url: &str) -> ProbeResponse {
        let http = match &self.http {
            Ok(c) => c,
            Err(e) => return ProbeResponse::unreachable(format!("client unavailable: {e}")),
        };

        let mut req = http.get(url);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        let resp = match req.send() {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(url, error = %e, "web: probe failed");
                return ProbeResponse::unreachable(e.to_string());
            }
        };

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        match resp.text() {
            Ok(body) => {
                tracing::debug!(url, http_status = status, "web: probe response");
                ProbeResponse {
                    status,
                    body,
                    headers,
                    error: None,
                }
            }
            Err(e) => ProbeResponse {
                status,
                body: String::new(),
                headers,
                error: Some(format!("failed to read body: {e}")),
            },
        }
    }
}
