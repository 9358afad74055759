// System routes
//
// - POST /expire/run - on-demand expiry pass (strict rate-limit tier)
// - GET /health - dependency health, never rate limited

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{expire_run_handler, health_handler};
use crate::middleware::rate_limit::strict_rate_limit;
use crate::state::AppState;

pub fn system_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/expire/run", post(expire_run_handler))
        .route_layer(middleware::from_fn_with_state(state, strict_rate_limit))
        .route("/health", get(health_handler))
}
