// Health-check module
//
// Layers mirror the rest of the workspace:
// - domain: the health report types
// - application: the use case assembling a report from probe results
// - infrastructure: the axum response adapter

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::HealthCheckUseCase;
pub use domain::{CheckState, HealthChecks, HealthStatus};
