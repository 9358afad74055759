// Axum adapter for the health report

use axum::{http::StatusCode, Json};

use crate::health::domain::HealthStatus;
use crate::response::ApiSuccess;

/// Wraps a health report in the response envelope. Degraded reports are
/// served as 503 so load balancers take the instance out of rotation.
pub fn health_response(status: HealthStatus) -> (StatusCode, Json<ApiSuccess<HealthStatus>>) {
    let http_status = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (http_status, Json(ApiSuccess::new(status)))
}
