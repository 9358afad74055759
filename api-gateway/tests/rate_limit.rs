// Rate-limit behavior over the full router.

mod common;

use api_gateway::Config;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use serde_json::{json, Value};

fn small_budget_app() -> TestApp {
    let config = Config {
        rate_limit_max_requests: 3,
        ..test_config()
    };
    build_app(config, &[("item_1", "Espresso Machine", 100)])
}

fn cancel_body() -> Value {
    json!({ "userId": "u", "reservationId": "res_whatever_0" })
}

fn post_with_ip(path: &str, body: &Value, ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/v1{path}"))
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn strict_budget_depletes_to_429() {
    let app = small_budget_app();

    for i in 0..3 {
        let (status, headers, _) =
            send(&app, post_with_ip("/cancel", &cancel_body(), "10.0.0.1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "request {i}");
        assert_eq!(headers.get("x-ratelimit-limit").unwrap(), "3");
        assert_eq!(
            headers.get("x-ratelimit-remaining").unwrap(),
            (2 - i).to_string().as_str()
        );
    }

    let (status, headers, body) =
        send(&app, post_with_ip("/cancel", &cancel_body(), "10.0.0.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "RATE_LIMITED");
    let retry_after = body["error"]["details"]["retryAfter"].as_u64().unwrap();
    assert!(retry_after >= 1);
    assert_eq!(
        headers.get("retry-after").unwrap().to_str().unwrap(),
        retry_after.to_string()
    );
    assert_eq!(headers.get("x-ratelimit-remaining").unwrap(), "0");
    assert!(headers.contains_key("x-ratelimit-reset"));
}

#[tokio::test]
async fn tokens_refill_over_time() {
    let app = small_budget_app();

    for _ in 0..3 {
        send(&app, post_with_ip("/cancel", &cancel_body(), "10.0.0.2")).await;
    }
    let (status, _, _) = send(&app, post_with_ip("/cancel", &cancel_body(), "10.0.0.2")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // One token refills in window/capacity ms.
    app.clock.advance(10_000 / 3 + 1);
    let (status, _, _) = send(&app, post_with_ip("/cancel", &cancel_body(), "10.0.0.2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn callers_are_limited_independently() {
    let app = small_budget_app();

    for _ in 0..3 {
        send(&app, post_with_ip("/cancel", &cancel_body(), "10.0.0.3")).await;
    }
    let (status, _, _) = send(&app, post_with_ip("/cancel", &cancel_body(), "10.0.0.3")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, _, _) = send(&app, post_with_ip("/cancel", &cancel_body(), "10.0.0.4")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reads_use_the_lenient_budget() {
    let app = small_budget_app();

    // 3x the strict budget; the lenient tier (5x) absorbs it.
    for _ in 0..9 {
        let request = Request::builder()
            .method("GET")
            .uri("/api/v1/items")
            .header("x-forwarded-for", "10.0.0.5")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn rate_limited_responses_carry_the_request_id() {
    let app = small_budget_app();

    for _ in 0..3 {
        send(&app, post_with_ip("/cancel", &cancel_body(), "10.0.0.6")).await;
    }
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/cancel")
        .header("content-type", "application/json")
        .header("x-forwarded-for", "10.0.0.6")
        .header("x-request-id", "req_limited_1")
        .body(Body::from(cancel_body().to_string()))
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["requestId"], "req_limited_1");
}
