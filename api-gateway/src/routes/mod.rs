// Routers for the API Gateway
//
// All endpoints mount under the configurable API prefix. The request-id
// layer and CORS wrap everything; rate limiting and idempotent replay are
// applied per router below.

mod item_routes;
mod reservation_routes;
mod system_routes;

use axum::{http::HeaderValue, middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::middleware::request_id::request_id_middleware;
use crate::state::AppState;

pub use item_routes::items_router;
pub use reservation_routes::reservations_router;
pub use system_routes::system_router;

/// Assembles the full application router.
pub fn app_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(items_router(state.clone()))
        .merge(reservations_router(state.clone()))
        .merge(system_router(state.clone()));

    let prefix = state.config().api_prefix.clone();
    let cors = cors_layer(&state.config().cors_origin);

    Router::new()
        .nest(&prefix, api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any);
    if origin == "*" {
        layer.allow_origin(Any)
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(origin) => layer.allow_origin(origin),
            Err(_) => {
                warn!(%origin, "invalid CORS_ORIGIN, falling back to any");
                layer.allow_origin(Any)
            }
        }
    }
}
