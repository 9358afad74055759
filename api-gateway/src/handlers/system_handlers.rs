// System handlers
//
// - POST /expire/run - run one batch expiry pass on demand
// - GET /health - liveness report with dependency checks

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use common::health::infrastructure::health_response;
use common::{ApiSuccess, CheckState, HealthCheckUseCase, HealthStatus};
use reservations::ExpireReservationsUseCase;
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::request_id::RequestId;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExpireRunResult {
    pub expired: u64,
    pub message: String,
}

/// Handler for POST /expire/run
///
/// The same pass the background worker runs on its schedule, exposed for
/// operators and tests. Safe to repeat: already-expired holds are not
/// touched again.
pub async fn expire_run_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<ApiSuccess<ExpireRunResult>>, AppError> {
    let use_case = ExpireReservationsUseCase::new(state.store(), state.cache(), state.clock());
    let result = use_case
        .execute()
        .await
        .map_err(|e| AppError::from(e).with_request_id(&request_id))?;

    Ok(Json(ApiSuccess::new(ExpireRunResult {
        expired: result.expired_count,
        message: format!("expired {} reservation(s)", result.expired_count),
    })))
}

/// Handler for GET /health
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiSuccess<HealthStatus>>) {
    let database = match state.store().ping().await {
        Ok(()) => CheckState::Ok,
        Err(_) => CheckState::Error,
    };
    // The in-process cache cannot fail separately from the process.
    let cache = CheckState::Ok;

    let status = HealthCheckUseCase::execute(database, cache, state.clock().now_ms());
    health_response(status)
}
