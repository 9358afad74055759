mod health_status;

pub use health_status::{CheckState, HealthChecks, HealthStatus};
