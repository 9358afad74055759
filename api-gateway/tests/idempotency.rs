// Idempotent replay semantics on the mutation routes.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn repeated_reserve_replays_byte_identical_response() {
    let app = seeded_app(&[("item_1", "Espresso Machine", 3)]);
    let body = json!({ "userId": "u", "itemId": "item_1", "qty": 2 });

    let (s1, h1, b1) = send_raw(&app, post_json_with_key("/reserve", &body, "retry-key-1")).await;
    let (s2, h2, b2) = send_raw(&app, post_json_with_key("/reserve", &body, "retry-key-1")).await;

    assert_eq!(s1, StatusCode::CREATED);
    assert_eq!(s2, StatusCode::CREATED);
    assert_eq!(b1, b2);
    assert!(h1.get("idempotency-replayed").is_none());
    assert_eq!(h2.get("idempotency-replayed").unwrap(), "true");

    // One hold, one decrement.
    assert_eq!(app.store.reservation_count(), 1);
    assert_eq!(available_qty(&app, "item_1").await, 1);
}

#[tokio::test]
async fn same_key_different_user_is_a_different_request() {
    let app = seeded_app(&[("item_1", "Espresso Machine", 4)]);

    let (s1, _, _) = send(
        &app,
        post_json_with_key(
            "/reserve",
            &json!({ "userId": "a", "itemId": "item_1", "qty": 1 }),
            "shared-key-12",
        ),
    )
    .await;
    let (s2, _, _) = send(
        &app,
        post_json_with_key(
            "/reserve",
            &json!({ "userId": "b", "itemId": "item_1", "qty": 1 }),
            "shared-key-12",
        ),
    )
    .await;

    assert_eq!(s1, StatusCode::CREATED);
    assert_eq!(s2, StatusCode::CREATED);
    assert_eq!(app.store.reservation_count(), 2);
    assert_eq!(available_qty(&app, "item_1").await, 2);
}

#[tokio::test]
async fn malformed_keys_are_rejected() {
    let app = seeded_app(&[("item_1", "Espresso Machine", 3)]);
    let body = json!({ "userId": "u", "itemId": "item_1", "qty": 1 });

    for key in ["short", "has spaces in it", "bang!bang!bang!"] {
        let (status, _, response) = send(&app, post_json_with_key("/reserve", &body, key)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "key {key:?}");
        assert_eq!(response["error"]["code"], "INVALID_IDEMPOTENCY_KEY");
    }
    // Nothing reached the engine.
    assert_eq!(app.store.reservation_count(), 0);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let app = seeded_app(&[("item_1", "Espresso Machine", 3)]);

    // First attempt fails validation; the failure must not be replayed.
    let (status, _, _) = send(
        &app,
        post_json_with_key(
            "/reserve",
            &json!({ "userId": "u", "itemId": "item_1", "qty": 6 }),
            "retry-after-fix",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, headers, _) = send(
        &app,
        post_json_with_key(
            "/reserve",
            &json!({ "userId": "u", "itemId": "item_1", "qty": 2 }),
            "retry-after-fix",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(headers.get("idempotency-replayed").is_none());
}

#[tokio::test]
async fn stale_records_are_not_replayed() {
    let app = seeded_app(&[("item_1", "Espresso Machine", 5)]);
    let body = json!({ "userId": "u", "itemId": "item_1", "qty": 1 });

    let (s1, _, _) = send(&app, post_json_with_key("/reserve", &body, "old-key-0001")).await;
    assert_eq!(s1, StatusCode::CREATED);

    // Past the 24h record lifetime the same key is a fresh request.
    app.clock.advance(25 * 60 * 60 * 1_000);
    let (s2, headers, _) = send(&app, post_json_with_key("/reserve", &body, "old-key-0001")).await;
    assert_eq!(s2, StatusCode::CREATED);
    assert!(headers.get("idempotency-replayed").is_none());
    assert_eq!(app.store.reservation_count(), 2);
}

#[tokio::test]
async fn confirm_replays_through_the_same_layer() {
    let app = seeded_app(&[("item_1", "Espresso Machine", 3)]);

    let (_, _, body) = send(
        &app,
        post_json("/reserve", &json!({ "userId": "u", "itemId": "item_1", "qty": 2 })),
    )
    .await;
    let reservation_id = body["data"]["id"].as_str().unwrap().to_string();
    let confirm_body = json!({ "userId": "u", "reservationId": reservation_id });

    let (s1, _, b1) = send_raw(
        &app,
        post_json_with_key("/confirm", &confirm_body, "confirm-key-1"),
    )
    .await;
    let (s2, h2, b2) = send_raw(
        &app,
        post_json_with_key("/confirm", &confirm_body, "confirm-key-1"),
    )
    .await;

    assert_eq!(s1, StatusCode::OK);
    assert_eq!(s2, StatusCode::OK);
    // The replay carries the original "confirmed", not "already_confirmed".
    assert_eq!(b1, b2);
    assert_eq!(h2.get("idempotency-replayed").unwrap(), "true");
}

#[tokio::test]
async fn requests_without_key_bypass_the_layer() {
    let app = seeded_app(&[("item_1", "Espresso Machine", 5)]);
    let body = json!({ "userId": "u", "itemId": "item_1", "qty": 1 });

    send(&app, post_json("/reserve", &body)).await;
    send(&app, post_json("/reserve", &body)).await;
    assert_eq!(app.store.reservation_count(), 2);
}
