// Reservation routes
//
// Mutations sit behind the strict rate-limit tier; POST /reserve and
// POST /confirm additionally get idempotent replay (a retried POST
// /cancel is already benign, it answers `already_cancelled`).

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{
    cancel_handler, confirm_handler, get_reservation_handler, list_user_reservations_handler,
    reserve_handler,
};
use crate::middleware::idempotency::idempotency_middleware;
use crate::middleware::rate_limit::{lenient_rate_limit, strict_rate_limit};
use crate::state::AppState;

pub fn reservations_router(state: AppState) -> Router<AppState> {
    let mutations = Router::new()
        .route("/reserve", post(reserve_handler))
        .route("/confirm", post(confirm_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            idempotency_middleware,
        ))
        .route("/cancel", post(cancel_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            strict_rate_limit,
        ));

    let reads = Router::new()
        .route(
            "/reservations/user/{user_id}",
            get(list_user_reservations_handler),
        )
        .route("/reservations/{id}", get(get_reservation_handler))
        .route_layer(middleware::from_fn_with_state(state, lenient_rate_limit));

    mutations.merge(reads)
}
