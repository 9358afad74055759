// Shared harness: the full router assembled over the in-memory store and
// a manual clock, driven through tower's oneshot.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use api_gateway::middleware::rate_limit::RateLimiter;
use api_gateway::{app_router, AppState, Config};
use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use reservations::{Item, ItemCache, ManualClock, MemoryStore};
use serde_json::Value;
use tower::ServiceExt;

pub const START_MS: i64 = 1_000_000;
pub const TTL_MS: i64 = 600_000;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        api_prefix: "/api/v1".to_string(),
        reservation_ttl_ms: TTL_MS,
        cache_ttl_items_ms: 30_000,
        rate_limit_window_ms: 10_000,
        // High enough to stay invisible to the flow suites.
        rate_limit_max_requests: 1_000,
        expiration_interval: Duration::from_secs(30),
        idempotency_ttl_ms: 24 * 60 * 60 * 1_000,
        cors_origin: "*".to_string(),
        log_level: "warn".to_string(),
    }
}

pub fn build_app(config: Config, items: &[(&str, &str, i64)]) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    for (id, name, qty) in items {
        store.put_item(Item::new(*id, *name, *qty, START_MS));
    }
    let clock = Arc::new(ManualClock::new(START_MS));
    let cache = Arc::new(ItemCache::new(clock.clone(), config.cache_ttl_items_ms));
    let limiter = Arc::new(RateLimiter::new(clock.clone(), (&config).into()));
    let state = AppState::new(
        store.clone(),
        store.clone(),
        cache,
        clock.clone(),
        limiter,
        config,
    );
    TestApp {
        router: app_router(state),
        store,
        clock,
    }
}

pub fn seeded_app(items: &[(&str, &str, i64)]) -> TestApp {
    build_app(test_config(), items)
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("/api/v1{path}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/v1{path}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_json_with_key(path: &str, body: &Value, key: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/v1{path}"))
        .header("content-type", "application/json")
        .header("idempotency-key", key)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sends a request through a clone of the router and decodes the envelope.
pub async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

/// Raw variant for byte-level comparisons.
pub async fn send_raw(app: &TestApp, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

pub async fn available_qty(app: &TestApp, item_id: &str) -> i64 {
    use reservations::ReservationStore;
    app.store
        .find_item(item_id)
        .await
        .unwrap()
        .unwrap()
        .available_qty()
}
