// Shared building blocks for the HTTP surface: the response envelope and
// the health-check module.

pub mod health;
pub mod response;

pub use health::{CheckState, HealthChecks, HealthCheckUseCase, HealthStatus};
pub use response::{ApiSuccess, ErrorBody, ErrorDetail};
