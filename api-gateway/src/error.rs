// API Gateway error handling
//
// Engine outcomes are tagged values; this module is where they, and the
// transport-level failures, become HTTP status codes and the documented
// error envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::ErrorBody;
use reservations::EngineError;
use serde_json::{json, Value};
use tracing::error;

use crate::middleware::request_id::RequestId;

/// Unified error type for the API Gateway.
///
/// # Error mapping
///
/// | Outcome / failure | HTTP status | Error code |
/// |-------------------|-------------|------------|
/// | validation | 400 | VALIDATION_ERROR |
/// | unknown item | 404 | ITEM_NOT_FOUND |
/// | unknown / foreign reservation | 404 | RESERVATION_NOT_FOUND |
/// | stock predicate failed | 409 | OUT_OF_STOCK |
/// | hold lapsed | 409 | EXPIRED |
/// | hold cancelled | 409 | CANCELLED |
/// | cancel after confirm | 409 | ALREADY_CONFIRMED |
/// | malformed Idempotency-Key | 400 | INVALID_IDEMPOTENCY_KEY |
/// | bucket depleted | 429 | RATE_LIMITED |
/// | store failure | 500 | INTERNAL_ERROR |
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    body: ErrorBody,
}

impl AppError {
    pub fn new(status: StatusCode, body: ErrorBody) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn with_request_id(mut self, request_id: &RequestId) -> Self {
        self.body = self.body.with_request_id(request_id.as_str());
        self
    }

    // -------------------------------------------------------------------------
    // Constructors, one per documented error code
    // -------------------------------------------------------------------------

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorBody::new("VALIDATION_ERROR", message),
        )
    }

    /// Validation failure with per-field messages.
    pub fn validation_fields(fields: Vec<(&'static str, &'static str)>) -> Self {
        let map: Value = fields
            .iter()
            .map(|(field, message)| ((*field).to_string(), json!(message)))
            .collect::<serde_json::Map<String, Value>>()
            .into();
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorBody::new("VALIDATION_ERROR", "Request validation failed")
                .with_details(json!({ "fields": map })),
        )
    }

    pub fn invalid_quantity(min: i64, max: i64) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorBody::new(
                "VALIDATION_ERROR",
                format!("qty must be an integer between {min} and {max}"),
            )
            .with_details(json!({ "min": min, "max": max })),
        )
    }

    pub fn item_not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ErrorBody::new("ITEM_NOT_FOUND", "Item not found"),
        )
    }

    pub fn reservation_not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ErrorBody::new("RESERVATION_NOT_FOUND", "Reservation not found"),
        )
    }

    pub fn out_of_stock(available: i64) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            ErrorBody::new("OUT_OF_STOCK", "Not enough stock available")
                .with_details(json!({ "available": available })),
        )
    }

    pub fn expired() -> Self {
        Self::new(
            StatusCode::CONFLICT,
            ErrorBody::new("EXPIRED", "Reservation has expired"),
        )
    }

    pub fn cancelled() -> Self {
        Self::new(
            StatusCode::CONFLICT,
            ErrorBody::new("CANCELLED", "Reservation was cancelled"),
        )
    }

    pub fn already_confirmed() -> Self {
        Self::new(
            StatusCode::CONFLICT,
            ErrorBody::new(
                "ALREADY_CONFIRMED",
                "Reservation is confirmed; confirmed stock is not refundable",
            ),
        )
    }

    pub fn invalid_idempotency_key() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorBody::new(
                "INVALID_IDEMPOTENCY_KEY",
                "Idempotency-Key must be 8-255 characters of [A-Za-z0-9_-]",
            ),
        )
    }

    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            ErrorBody::new("RATE_LIMITED", "Too many requests, slow down")
                .with_details(json!({ "retryAfter": retry_after_secs })),
        )
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new("INTERNAL_ERROR", "Internal error"),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        // Details are logged, never exposed.
        error!(error = %err, "engine failure");
        Self::internal()
    }
}
