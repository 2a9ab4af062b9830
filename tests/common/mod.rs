//! Shared utilities for integration tests.

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use blood_sugar_log::http::{AppState, HttpServer};
use blood_sugar_log::{LogStore, ServiceConfig};
use serde_json::Value;
use tower::ServiceExt;

/// Router over a fresh in-memory store with default settings.
pub fn test_app() -> (Router, LogStore) {
    let store = LogStore::open_in_memory().unwrap();
    let app = HttpServer::build_router(
        &ServiceConfig::default(),
        AppState {
            store: store.clone(),
        },
    );
    (app, store)
}

/// Build a request carrying a JSON body.
pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request without a body.
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send one request through the router and decode the JSON response body.
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
}
