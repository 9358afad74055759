// Item routes
//
// - GET /items - list items (sortable)
// - GET /items/{id} - item details
//
// Reads sit behind the lenient rate-limit tier.

use axum::{middleware, routing::get, Router};

use crate::handlers::{get_item_handler, list_items_handler};
use crate::middleware::rate_limit::lenient_rate_limit;
use crate::state::AppState;

pub fn items_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items_handler))
        .route("/items/{id}", get(get_item_handler))
        .route_layer(middleware::from_fn_with_state(state, lenient_rate_limit))
}
