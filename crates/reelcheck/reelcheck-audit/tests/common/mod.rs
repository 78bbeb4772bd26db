//! In-memory fakes for the remote service and the web probe.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use reelcheck_core::config::ReelcheckConfig;
use reelcheck_sources::{
    CredentialTier, DataSource, ProbeResponse, QueryRequest, QueryResult, WebProbe,
};
use serde_json::{json, Value};

pub const SITE: &str = "https://reel.example.com";

type Handler = Box<dyn Fn(&QueryRequest) -> QueryResult>;

/// Scriptable remote. Every request is recorded.
pub struct FakeRemote {
    handler: Handler,
    anon: bool,
    calls: RefCell<Vec<QueryRequest>>,
}

impl FakeRemote {
    pub fn new(handler: impl Fn(&QueryRequest) -> QueryResult + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            anon: true,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Every request fails with a 404.
    pub fn empty() -> Self {
        Self::new(|_| QueryResult::http_error(404, "relation does not exist"))
    }

    pub fn without_anon(mut self) -> Self {
        self.anon = false;
        self
    }

    pub fn calls(&self) -> Vec<QueryRequest> {
        self.calls.borrow().clone()
    }
}

impl DataSource for FakeRemote {
    fn query(&self, request: &QueryRequest) -> QueryResult {
        self.calls.borrow_mut().push(request.clone());
        if request.tier == CredentialTier::Anonymous && !self.anon {
            return QueryResult::transport_error("no credential configured for the anonymous tier");
        }
        (self.handler)(request)
    }

    fn has_tier(&self, tier: CredentialTier) -> bool {
        tier == CredentialTier::Service || self.anon
    }
}

/// 200 with rows.
pub fn rows(data: Vec<Value>) -> QueryResult {
    QueryResult {
        data,
        count: None,
        status: 200,
        error: None,
    }
}

/// 200 with an exact count.
pub fn counted(total: u64) -> QueryResult {
    QueryResult {
        data: if total > 0 { vec![json!({"id": 1})] } else { vec![] },
        count: Some(total),
        status: 200,
        error: None,
    }
}

/// 201 echoing one row with `id`.
pub fn created(id: &str) -> QueryResult {
    QueryResult {
        data: vec![json!({ "id": id })],
        count: None,
        status: 201,
        error: None,
    }
}

/// Pages keyed by path; unknown paths are 404.
#[derive(Default)]
pub struct FakeWeb {
    pages: HashMap<String, ProbeResponse>,
    calls: RefCell<Vec<String>>,
}

impl FakeWeb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, path: &str, body: &str) -> Self {
        self.pages.insert(
            path.to_string(),
            ProbeResponse {
                status: 200,
                body: body.to_string(),
                ..ProbeResponse::default()
            },
        );
        self
    }

    pub fn response(mut self, path: &str, response: ProbeResponse) -> Self {
        self.pages.insert(path.to_string(), response);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl WebProbe for FakeWeb {
    fn get(&self, url: &str) -> ProbeResponse {
        self.calls.borrow_mut().push(url.to_string());
        let path = url.strip_prefix(SITE).unwrap_or(url);
        self.pages.get(path).cloned().unwrap_or(ProbeResponse {
            status: 404,
            body: "not found".to_string(),
            ..ProbeResponse::default()
        })
    }
}

/// Web probe that never reaches anything.
pub struct OfflineWeb;

impl WebProbe for OfflineWeb {
    fn get(&self, _url: &str) -> ProbeResponse {
        ProbeResponse::unreachable("offline")
    }
}

/// Config with a remote and a site configured.
pub fn online_config() -> ReelcheckConfig {
    let mut config = ReelcheckConfig::default();
    config.remote.base_url = Some("https://project.example.co".to_string());
    config.remote.service_key = Some("service-secret".to_string());
    config.remote.anon_key = Some("anon-public".to_string());
    config.web.site_url = Some(SITE.to_string());
    config
}

/// Temp dirs default to a hidden prefix the scanner skips.
pub fn source_dir() -> tempfile::TempDir {
    tempfile::Builder::new().prefix("app").tempdir().unwrap()
}

pub fn write(root: &std::path::Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}
