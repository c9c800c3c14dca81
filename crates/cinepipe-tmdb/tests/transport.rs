//! Retrying HTTP transport against a local server

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cinepipe_core::{HttpTransport, RetryPolicy, Transport};
use common::FakeServer;
use serde_json::json;

fn transport(attempts: u32) -> HttpTransport {
    HttpTransport::new(
        Duration::from_secs(5),
        RetryPolicy {
            attempts,
            delay_base: 0,
        },
    )
    .unwrap()
}

#[test]
fn non_200_on_every_attempt_yields_none() {
    let server = FakeServer::start(|_| (500, "{}".to_string()));

    let out = transport(3).fetch_json(&format!("{}/movie/1?api_key=k", server.api_url()));

    assert!(out.is_none());
    assert_eq!(server.hits().len(), 3);
}

#[test]
fn success_returns_immediately() {
    let server = FakeServer::start(|_| (200, json!({"id": 1}).to_string()));

    let out = transport(3).fetch_json(&format!("{}/movie/1?api_key=k", server.api_url()));

    assert_eq!(out, Some(json!({"id": 1})));
    assert_eq!(server.hits().len(), 1);
}

#[test]
fn recovers_when_server_comes_back() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let server = FakeServer::start(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            (429, "{}".to_string())
        } else {
            (200, json!({"ok": true}).to_string())
        }
    });

    let out = transport(3).fetch_json(&format!("{}/x?api_key=k", server.api_url()));

    assert_eq!(out, Some(json!({"ok": true})));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn invalid_json_body_is_retried() {
    let server = FakeServer::start(|_| (200, "<html>maintenance</html>".to_string()));

    let out = transport(2).fetch_json(&format!("{}/x?api_key=k", server.api_url()));

    assert!(out.is_none());
    assert_eq!(server.hits().len(), 2);
}

#[test]
fn client_errors_are_retried_like_server_errors() {
    let server = FakeServer::start(|_| (404, "{}".to_string()));

    let out = transport(2).fetch_json(&format!("{}/movie/999?api_key=k", server.api_url()));

    assert!(out.is_none());
    assert_eq!(server.hits().len(), 2);
}
