//! HTTP probe tests against a local one-shot server.

mod common;

use std::time::Duration;

use reelcheck_sources::{HttpProbe, ProbeResponse, WebProbe};

use common::{closed_port_url, serve_once};

#[test]
fn probe_captures_status_body_and_lowercased_headers() {
    let (url, rx) = serve_once(
        "200 OK",
        &[
            ("Strict-Transport-Security", "max-age=63072000"),
            ("Content-Type", "text/html"),
        ],
        "<html><title>Reel</title></html>",
    );
    let probe = HttpProbe::new(Duration::from_secs(5), Some("site-token".to_string()));
    let resp = probe.get(&format!("{url}/"));
    let req = rx.recv().unwrap();

    assert_eq!(req.header("authorization"), Some("Bearer site-token"));
    assert!(resp.ok());
    assert!(resp.contains("<TITLE>reel"));
    assert_eq!(resp.header("Strict-Transport-Security"), Some("max-age=63072000"));
    assert!(resp.error.is_none());
}

#[test]
fn probe_without_token_sends_no_authorization() {
    let (url, rx) = serve_once("404 Not Found", &[], "missing");
    let resp = HttpProbe::new(Duration::from_secs(5), None).get(&format!("{url}/privacy"));
    let req = rx.recv().unwrap();

    assert!(req.header("authorization").is_none());
    assert_eq!(resp.status, 404);
    assert!(resp.reached());
    assert!(!resp.ok());
    assert_eq!(resp.describe(), "HTTP 404");
}

#[test]
fn unreachable_host_is_status_zero() {
    let resp = HttpProbe::new(Duration::from_secs(2), None).get(&closed_port_url());

    assert_eq!(resp.status, 0);
    assert!(!resp.reached());
    assert!(resp.describe().starts_with("unreachable"));
}

#[test]
fn malformed_url_is_folded_into_the_response() {
    let resp = HttpProbe::new(Duration::from_secs(2), None).get("not a url");
    assert_eq!(resp.status, 0);
    assert!(resp.body.is_empty());
    assert!(resp.error.is_some());
    assert!(!ProbeResponse::default().ok());
}
