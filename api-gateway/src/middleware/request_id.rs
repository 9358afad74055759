// Request-id middleware
//
// Echoes an inbound X-Request-Id or mints one, exposes it to handlers via
// request extensions, stamps it on the response, and scopes a tracing span
// around the request so every log line carries the correlator.

use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::{NoContext, Timestamp, Uuid};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request correlator, readable by handlers through `Extension`.
#[derive(Debug, Clone)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("req_{}", Uuid::new_v7(Timestamp::now(NoContext)).simple()));

    req.extensions_mut().insert(RequestId::new(id.clone()));

    let span = tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id = %id,
    );
    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}
