// API Gateway - HTTP surface for the reservation engine
//
// Exposed as a library so the integration test suites can assemble the
// full router over the in-memory store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::app_router;
pub use state::AppState;
