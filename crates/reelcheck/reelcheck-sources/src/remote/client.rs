//! Blocking HTTP client for the remote data service.
//!
//! One attempt per call, bounded by the configured timeout. Every failure is
//! folded into the returned [`QueryResult`].

use std::time::Duration;

use reelcheck_core::config::RemoteConfig;
use serde_json::Value;

use super::{parse_content_range, CredentialTier, DataSource, Method, QueryRequest, QueryResult};

/// Resolved connection settings.
#[derive(Debug, Clone)]
pub struct RemoteClientConfig {
    /// Base URL of the service, without the REST path.
    pub base_url: String,
    /// REST path prefix, e.g. `/rest/v1`.
    pub rest_path: String,
    pub service_key: String,
    pub anon_key: Option<String>,
    pub timeout: Duration,
}

impl RemoteClientConfig {
    /// Resolve from loaded config. `None` when the URL or service key is absent.
    pub fn from_config(config: &RemoteConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        Some(Self {
            base_url: config.base_url.clone()?,
            rest_path: config.effective_rest_path().to_string(),
            service_key: config.service_key.clone()?,
            anon_key: config.anon_key.clone().filter(|k| !k.is_empty()),
            timeout: config.effective_timeout(),
        })
    }
}

/// reqwest-backed [`DataSource`].
#[derive(Debug)]
pub struct RemoteClient {
    config: RemoteClientConfig,
    http: Result<reqwest::blocking::Client, String>,
}

impl RemoteClient {
    pub fn new(config: RemoteClientConfig) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(|e: reqwest::Error| e.to_string());
        if let Err(ref e) = http {
            tracing::error!(error = %e, "remote: failed to build HTTP client");
        }
        Self { config, http }
    }

    /// Full URL for a resource path.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.rest_path.trim_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn key_for(&self, tier: CredentialTier) -> Option<&str> {
        match tier {
            CredentialTier::Service => Some(self.config.service_key.as_str()),
            CredentialTier::Anonymous => self.config.anon_key.as_deref(),
        }
    }
}

impl DataSource for RemoteClient {
    fn query(&self, request: &QueryRequest) -> QueryResult {
        let http = match &self.http {
            Ok(c) => c,
            Err(e) => return QueryResult::transport_error(format!("client unavailable: {e}")),
        };
        let Some(key) = self.key_for(request.tier) else {
            return QueryResult::transport_error(format!(
                "no credential configured for the {} tier",
                request.tier.as_str()
            ));
        };

        let url = self.url_for(&request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
        };

        let mut req = http
            .request(method, &url)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Accept", "application/json");
        req = match request.method {
            Method::Get => req.header("Prefer", "count=exact"),
            Method::Post | Method::Patch => req.header("Prefer", "return=representation"),
        };
        if let Some((start, end)) = request.range {
            req = req
                .header("Range-Unit", "items")
                .header("Range", format!("{start}-{end}"));
        }
        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let resp = match req.send() {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(
                    resource = request.resource(),
                    method = request.method.as_str(),
                    error = %e,
                    "remote: request failed"
                );
                return QueryResult::transport_error(e.to_string());
            }
        };

        let status = resp.status().as_u16();
        let count = resp
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);
        let text = match resp.text() {
            Ok(t) => t,
            Err(e) => {
                return QueryResult {
                    data: Vec::new(),
                    count,
                    status,
                    error: Some(format!("failed to read response body: {e}")),
                }
            }
        };

        tracing::debug!(
            resource = request.resource(),
            method = request.method.as_str(),
            tier = request.tier.as_str(),
            http_status = status,
            "remote: response"
        );

        if !(200..300).contains(&status) {
            return QueryResult::http_error(status, text);
        }

        let (data, error) = parse_rows(&text);
        QueryResult {
            data,
            count,
            status,
            error,
        }
    }

    fn has_tier(&self, tier: CredentialTier) -> bool {
        self.key_for(tier).is_some()
    }
}

/// Decode a response body into rows. Arrays are rows; a single object is one
/// row; an empty body is zero rows.
fn parse_rows(text: &str) -> (Vec<Value>, Option<String>) {
    if text.trim().is_empty() {
        return (Vec::new(), None);
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(rows)) => (rows, None),
        Ok(Value::Null) => (Vec::new(), None),
        Ok(other) => (vec![other], None),
        Err(e) => (Vec::new(), Some(format!("unparseable response body: {e}"))),
    }
}
