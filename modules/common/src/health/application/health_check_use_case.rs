// HealthCheckUseCase - assembles the health report from probe results

use crate::health::domain::{CheckState, HealthChecks, HealthStatus};

pub struct HealthCheckUseCase;

impl HealthCheckUseCase {
    /// Builds the report. The caller runs the actual probes; this keeps the
    /// use case free of datastore handles.
    pub fn execute(database: CheckState, cache: CheckState, now_ms: i64) -> HealthStatus {
        let checks = HealthChecks { database, cache };
        let status = if checks.database == CheckState::Ok && checks.cache == CheckState::Ok {
            "ok"
        } else {
            "degraded"
        };
        HealthStatus {
            status: status.to_string(),
            timestamp: now_ms,
            checks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_report() {
        let status = HealthCheckUseCase::execute(CheckState::Ok, CheckState::Ok, 1_000);
        assert_eq!(status.status, "ok");
        assert!(status.is_healthy());
        assert_eq!(status.timestamp, 1_000);
    }

    #[test]
    fn test_degraded_report() {
        let status = HealthCheckUseCase::execute(CheckState::Error, CheckState::Ok, 1_000);
        assert_eq!(status.status, "degraded");
        assert!(!status.is_healthy());
    }
}
