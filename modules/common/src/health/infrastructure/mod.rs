mod axum_response;

pub use axum_response::health_response;
