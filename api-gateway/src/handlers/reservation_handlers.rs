// Reservation handlers
//
// - POST /reserve - place a hold (201 on success)
// - POST /confirm - consume a hold
// - POST /cancel - release a hold
// - GET /reservations/user/{userId} - a user's holds, optional ?status=
// - GET /reservations/{id} - single hold
//
// Repeating the same operation on a finalized hold is benign and answers
// 200 with an `already_*` status; a conflicting operation answers 409.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use common::ApiSuccess;
use reservations::{
    CancelCommand, CancelOutcome, CancelUseCase, ConfirmCommand, ConfirmOutcome, ConfirmUseCase,
    GetReservationUseCase, ListUserReservationsUseCase, Quantity, ReservationResponse,
    ReservationStatus, ReserveCommand, ReserveOutcome, ReserveUseCase,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::request_id::RequestId;
use crate::state::AppState;

// =============================================================================
// Request/response DTOs
// =============================================================================

/// Fields are optional so that missing values surface as per-field
/// validation messages instead of a serde parse error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveBody {
    pub user_id: Option<String>,
    pub item_id: Option<String>,
    pub qty: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationActionBody {
    pub user_id: Option<String>,
    pub reservation_id: Option<String>,
}

/// Payload for POST /confirm and POST /cancel successes.
#[derive(Debug, Serialize)]
pub struct TransitionResult {
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ReservationListParams {
    pub status: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handler for POST /reserve
pub async fn reserve_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<ReserveBody>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiSuccess<ReservationResponse>>), AppError> {
    let Json(body) = body
        .map_err(|rejection| AppError::validation(rejection.body_text()).with_request_id(&request_id))?;

    let mut fields = Vec::new();
    if body.user_id.as_deref().is_none_or(str::is_empty) {
        fields.push(("userId", "must be a non-empty string"));
    }
    if body.item_id.as_deref().is_none_or(str::is_empty) {
        fields.push(("itemId", "must be a non-empty string"));
    }
    match body.qty {
        None => fields.push(("qty", "is required")),
        Some(qty) if Quantity::new(qty).is_none() => {
            fields.push(("qty", "must be an integer between 1 and 5"));
        }
        Some(_) => {}
    }
    if !fields.is_empty() {
        return Err(AppError::validation_fields(fields).with_request_id(&request_id));
    }

    let use_case = ReserveUseCase::new(
        state.store(),
        state.cache(),
        state.clock(),
        state.config().reservation_ttl_ms,
    );
    let outcome = use_case
        .execute(ReserveCommand {
            user_id: body.user_id.unwrap_or_default(),
            item_id: body.item_id.unwrap_or_default(),
            qty: body.qty.unwrap_or_default(),
        })
        .await
        .map_err(|e| AppError::from(e).with_request_id(&request_id))?;

    match outcome {
        ReserveOutcome::Reserved(reservation) => {
            Ok((StatusCode::CREATED, Json(ApiSuccess::new(reservation))))
        }
        ReserveOutcome::ItemNotFound => {
            Err(AppError::item_not_found().with_request_id(&request_id))
        }
        ReserveOutcome::OutOfStock { available } => {
            Err(AppError::out_of_stock(available).with_request_id(&request_id))
        }
        ReserveOutcome::InvalidQuantity { min, max } => {
            Err(AppError::invalid_quantity(min, max).with_request_id(&request_id))
        }
    }
}

/// Handler for POST /confirm
pub async fn confirm_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<ReservationActionBody>, JsonRejection>,
) -> Result<Json<ApiSuccess<TransitionResult>>, AppError> {
    let (user_id, reservation_id) = validate_action_body(body, &request_id)?;

    let use_case = ConfirmUseCase::new(state.store(), state.cache(), state.clock());
    let outcome = use_case
        .execute(ConfirmCommand {
            user_id,
            reservation_id,
        })
        .await
        .map_err(|e| AppError::from(e).with_request_id(&request_id))?;

    match outcome {
        ConfirmOutcome::Confirmed => Ok(Json(ApiSuccess::new(TransitionResult {
            status: "confirmed",
        }))),
        ConfirmOutcome::AlreadyConfirmed => Ok(Json(ApiSuccess::new(TransitionResult {
            status: "already_confirmed",
        }))),
        ConfirmOutcome::Cancelled => Err(AppError::cancelled().with_request_id(&request_id)),
        ConfirmOutcome::Expired => Err(AppError::expired().with_request_id(&request_id)),
        ConfirmOutcome::NotFound => {
            Err(AppError::reservation_not_found().with_request_id(&request_id))
        }
    }
}

/// Handler for POST /cancel
pub async fn cancel_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<ReservationActionBody>, JsonRejection>,
) -> Result<Json<ApiSuccess<TransitionResult>>, AppError> {
    let (user_id, reservation_id) = validate_action_body(body, &request_id)?;

    let use_case = CancelUseCase::new(state.store(), state.cache(), state.clock());
    let outcome = use_case
        .execute(CancelCommand {
            user_id,
            reservation_id,
        })
        .await
        .map_err(|e| AppError::from(e).with_request_id(&request_id))?;

    match outcome {
        CancelOutcome::Cancelled => Ok(Json(ApiSuccess::new(TransitionResult {
            status: "cancelled",
        }))),
        CancelOutcome::AlreadyCancelled => Ok(Json(ApiSuccess::new(TransitionResult {
            status: "already_cancelled",
        }))),
        CancelOutcome::AlreadyConfirmed => {
            Err(AppError::already_confirmed().with_request_id(&request_id))
        }
        CancelOutcome::NotFound => {
            Err(AppError::reservation_not_found().with_request_id(&request_id))
        }
    }
}

/// Handler for GET /reservations/user/{userId}
pub async fn list_user_reservations_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Query(params): Query<ReservationListParams>,
) -> Result<Json<ApiSuccess<Vec<ReservationResponse>>>, AppError> {
    let status: Option<ReservationStatus> = match params.status.as_deref() {
        None => None,
        Some(raw) => Some(raw.parse().map_err(|()| {
            AppError::validation(
                "status must be one of: reserved, confirmed, cancelled, expired",
            )
            .with_request_id(&request_id)
        })?),
    };

    let use_case = ListUserReservationsUseCase::new(state.store());
    let reservations = use_case
        .execute(&user_id, status)
        .await
        .map_err(|e| AppError::from(e).with_request_id(&request_id))?;

    Ok(Json(ApiSuccess::new(reservations)))
}

/// Handler for GET /reservations/{id}
pub async fn get_reservation_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiSuccess<ReservationResponse>>, AppError> {
    let use_case = GetReservationUseCase::new(state.store());
    let reservation = use_case
        .execute(&id)
        .await
        .map_err(|e| AppError::from(e).with_request_id(&request_id))?
        .ok_or_else(|| AppError::reservation_not_found().with_request_id(&request_id))?;

    Ok(Json(ApiSuccess::new(reservation)))
}

fn validate_action_body(
    body: Result<Json<ReservationActionBody>, JsonRejection>,
    request_id: &RequestId,
) -> Result<(String, String), AppError> {
    let Json(body) = body
        .map_err(|rejection| AppError::validation(rejection.body_text()).with_request_id(request_id))?;

    let mut fields = Vec::new();
    if body.user_id.as_deref().is_none_or(str::is_empty) {
        fields.push(("userId", "must be a non-empty string"));
    }
    if body.reservation_id.as_deref().is_none_or(str::is_empty) {
        fields.push(("reservationId", "must be a non-empty string"));
    }
    if !fields.is_empty() {
        return Err(AppError::validation_fields(fields).with_request_id(request_id));
    }

    Ok((
        body.user_id.unwrap_or_default(),
        body.reservation_id.unwrap_or_default(),
    ))
}
