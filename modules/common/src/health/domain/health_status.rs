// Health report types

use serde::{Deserialize, Serialize};

/// Result of probing one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    Ok,
    Error,
}

/// Per-dependency probe results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub database: CheckState,
    pub cache: CheckState,
}

/// Health report served by `GET /health`. `timestamp` is epoch
/// milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: i64,
    pub checks: HealthChecks,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.checks.database == CheckState::Ok && self.checks.cache == CheckState::Ok
    }
}
