// Idempotent replay for mutation routes
//
// A client retrying `POST /reserve` or `POST /confirm` with the same
// Idempotency-Key gets the original response back, byte for byte, without
// the engine running again. Records are keyed by `(key, route, userId)`; the
// request body is deliberately NOT fingerprinted, so a caller reusing a
// key with a different payload still receives the first response. Only
// 2xx responses are stored; a failed call can always be retried.
//
// The handler stays a plain `(request) -> response` function: this layer
// buffers the request to read `userId`, lets the handler produce its
// response, and then inspects and persists that response.

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use reservations::IdempotencyRecord;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::middleware::request_id::RequestId;
use crate::state::AppState;

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";
/// Stamped on responses served from the idempotency store.
pub const REPLAYED_HEADER: &str = "idempotency-replayed";

const KEY_MIN_LEN: usize = 8;
const KEY_MAX_LEN: usize = 255;
/// Mutation bodies are small; anything larger is not ours.
const MAX_BODY_BYTES: usize = 64 * 1024;

pub async fn idempotency_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let request_id = req.extensions().get::<RequestId>().cloned();

    let Some(raw_key) = req
        .headers()
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
    else {
        // No key: the layer stays out of the way entirely.
        return next.run(req).await;
    };

    if !is_valid_key(&raw_key) {
        let mut error = AppError::invalid_idempotency_key();
        if let Some(request_id) = &request_id {
            error = error.with_request_id(request_id);
        }
        return error.into_response();
    }

    let route = req.uri().path().to_string();
    let (parts, body) = req.into_parts();
    let body_bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            let mut error = AppError::validation("Request body too large or unreadable");
            if let Some(request_id) = &request_id {
                error = error.with_request_id(request_id);
            }
            return error.into_response();
        }
    };
    let user_id = user_id_from_body(&body_bytes);

    let now_ms = state.clock().now_ms();
    let oldest = now_ms - state.config().idempotency_ttl_ms;
    match state
        .idempotency()
        .find_fresh(&raw_key, &route, &user_id, oldest)
        .await
    {
        Ok(Some(record)) => {
            debug!(key = %raw_key, %route, "replaying stored response");
            return replay(record);
        }
        Ok(None) => {}
        Err(error) => {
            warn!(%error, "idempotency lookup failed; processing without replay");
        }
    }

    let req = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(req).await;

    if !response.status().is_success() {
        return response;
    }

    // Buffer the fresh success so the retry path can serve it verbatim.
    let (parts, body) = response.into_parts();
    let body_bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!(%error, "failed to buffer response for idempotency store");
            return AppError::internal().into_response();
        }
    };

    let record = IdempotencyRecord {
        key: raw_key,
        route,
        user_id,
        response_status: parts.status.as_u16(),
        response_body: String::from_utf8_lossy(&body_bytes).into_owned(),
        created_at: now_ms,
    };
    if let Err(error) = state.idempotency().insert(&record).await {
        // The caller still gets their success; only the replay is lost.
        warn!(%error, "failed to store idempotency record");
    }

    Response::from_parts(parts, Body::from(body_bytes))
}

fn is_valid_key(key: &str) -> bool {
    (KEY_MIN_LEN..=KEY_MAX_LEN).contains(&key.len())
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// The mutation bodies carry the caller identity as a `userId` field.
/// Anything unreadable keys as the anonymous caller; the handler will
/// reject such a request anyway.
fn user_id_from_body(body: &Bytes) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("userId")?.as_str().map(str::to_owned))
        .unwrap_or_default()
}

fn replay(record: IdempotencyRecord) -> Response {
    let status =
        StatusCode::from_u16(record.response_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, record.response_body).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
        .headers_mut()
        .insert(REPLAYED_HEADER, HeaderValue::from_static("true"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_charset_and_length() {
        assert!(is_valid_key("abcd-1234"));
        assert!(is_valid_key("A_b-C_d-E_f-0123"));
        assert!(is_valid_key(&"k".repeat(255)));

        assert!(!is_valid_key("short"));
        assert!(!is_valid_key(&"k".repeat(256)));
        assert!(!is_valid_key("has space!"));
        assert!(!is_valid_key("päivämäärä"));
    }

    #[test]
    fn test_user_id_extraction() {
        assert_eq!(
            user_id_from_body(&Bytes::from_static(b"{\"userId\":\"u1\",\"qty\":2}")),
            "u1"
        );
        assert_eq!(user_id_from_body(&Bytes::from_static(b"{\"qty\":2}")), "");
        assert_eq!(user_id_from_body(&Bytes::from_static(b"not json")), "");
    }
}
