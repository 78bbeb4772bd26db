//! Remote query layer: request/response shapes, the `DataSource` seam, and
//! the reqwest-backed [`RemoteClient`].

pub mod client;

use serde_json::Value;

pub use client::{RemoteClient, RemoteClientConfig};

/// Privilege level used for a request.
///
/// Access-control checks issue the same read under both tiers and assert the
/// restricted tier is denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CredentialTier {
    /// Full-access service credential.
    #[default]
    Service,
    /// Restricted public credential.
    Anonymous,
}

impl CredentialTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Anonymous => "anonymous",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
        }
    }
}

/// One request against a resource path relative to the REST base, e.g.
/// `movies?select=id&poster_url=is.null&limit=1`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub path: String,
    pub method: Method,
    pub body: Option<Value>,
    pub tier: CredentialTier,
    /// Inclusive row range sent as a `Range` header.
    pub range: Option<(u64, u64)>,
}

impl QueryRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Get,
            body: None,
            tier: CredentialTier::Service,
            range: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            body: Some(body),
            ..Self::get(path)
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Patch,
            body: Some(body),
            ..Self::get(path)
        }
    }

    pub fn tier(mut self, tier: CredentialTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn range(mut self, start: u64, end: u64) -> Self {
        self.range = Some((start, end));
        self
    }

    /// Resource name without the query string.
    pub fn resource(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }
}

/// Normalized response. `status == 0` means the request never completed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    pub data: Vec<Value>,
    /// Exact total from `Content-Range`, when the service reported one.
    pub count: Option<u64>,
    pub status: u16,
    pub error: Option<String>,
}

impl QueryResult {
    /// A request that never produced an HTTP response.
    pub fn transport_error(error: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            count: None,
            status: 0,
            error: Some(error.into()),
        }
    }

    /// A non-2xx response, returned faithfully so callers can assert on it.
    pub fn http_error(status: u16, body: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            count: None,
            status,
            error: Some(body.into()),
        }
    }

    /// Successful read: 200, or 206 when a range was requested.
    pub fn ok(&self) -> bool {
        self.status == 200 || self.status == 206
    }

    /// Successful write: 200 or 201.
    pub fn created(&self) -> bool {
        self.status == 200 || self.status == 201
    }

    pub fn is_transport_error(&self) -> bool {
        self.status == 0
    }

    /// Any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Denied or empty: what a restricted tier must see on protected data.
    pub fn denied_or_empty(&self) -> bool {
        (!self.is_transport_error() && !self.is_success()) || (self.is_success() && self.data.is_empty())
    }

    /// The exact count when reported, else the number of rows returned.
    /// Only meaningful for unpaged reads; a `count` query returns at most
    /// one row, so callers needing a total read `count` directly.
    pub fn total(&self) -> u64 {
        self.count.unwrap_or(self.data.len() as u64)
    }

    /// Short description for skip/fail diagnostics.
    pub fn describe(&self) -> String {
        match (&self.error, self.status) {
            (Some(e), 0) => format!("transport error: {e}"),
            (Some(e), status) => format!("HTTP {status}: {}", truncate(e, 200)),
            (None, status) => format!("HTTP {status}"),
        }
    }
}

/// Parse the total from a `Content-Range` header shaped `<start>-<end>/<total>`
/// (or `*/<total>`). An unknown total (`*`) yields `None`.
pub fn parse_content_range(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    match total.trim() {
        "*" => None,
        t => t.parse().ok(),
    }
}

/// The seam every check uses to talk to the data service.
///
/// Implementations must be total: failures come back as a [`QueryResult`]
/// with a status and an error string, never as a panic.
pub trait DataSource {
    fn query(&self, request: &QueryRequest) -> QueryResult;

    /// Whether a credential for `tier` is available at all.
    fn has_tier(&self, _tier: CredentialTier) -> bool {
        true
    }

    /// Count rows of `table` matching PostgREST-style `filters`
    /// (e.g. `["poster_url=is.null"]`). Only one row is transferred.
    fn count(&self, table: &str, filters: &[&str]) -> QueryResult {
        self.count_as(table, filters, CredentialTier::Service)
    }

    fn count_as(&self, table: &str, filters: &[&str], tier: CredentialTier) -> QueryResult {
        let mut path = format!("{table}?select=*&limit=1");
        for filter in filters {
            path.push('&');
            path.push_str(filter);
        }
        self.query(&QueryRequest::get(path).tier(tier))
    }

    /// Fetch up to `limit` rows of `columns` from `table`.
    fn sample(&self, table: &str, columns: &str, limit: usize) -> QueryResult {
        self.sample_as(table, columns, limit, CredentialTier::Service)
    }

    fn sample_as(&self, table: &str, columns: &str, limit: usize, tier: CredentialTier) -> QueryResult {
        self.query(&QueryRequest::get(format!("{table}?select={columns}&limit={limit}")).tier(tier))
    }

    /// Insert `body` (an object or an array of objects) into `table`.
    fn insert(&self, table: &str, body: Value) -> QueryResult {
        self.query(&QueryRequest::post(table, body))
    }
}

/// Stand-in used when no remote service is configured: every request is a
/// transport error, so remote-backed checks resolve to prerequisite-missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl DataSource for Unconfigured {
    fn query(&self, _request: &QueryRequest) -> QueryResult {
        QueryResult::transport_error("remote data service not configured")
    }

    fn has_tier(&self, _tier: CredentialTier) -> bool {
        false
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
