// Background tasks - the expiration worker and the idempotency janitor
//
// Both are interval loops: a failed pass is logged and the schedule
// continues. At-most-once execution is not needed anywhere here; every
// pass is idempotent at the store level.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::application::use_cases::ExpireReservationsUseCase;
use crate::domain::clock::Clock;
use crate::domain::repositories::IdempotencyStore;

/// Spawns the periodic expiration pass. The caller is expected to have run
/// one pass inline at startup already, so the first tick is skipped.
pub fn spawn_expiration_worker(
    use_case: ExpireReservationsUseCase,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match use_case.execute().await {
                Ok(result) if result.expired_count > 0 => {
                    info!(expired = result.expired_count, "expired lapsed reservations");
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(%error, "expiration pass failed; will retry on next tick");
                }
            }
        }
    })
}

/// Spawns the sweep that deletes idempotency records older than `ttl_ms`.
pub fn spawn_idempotency_janitor(
    store: Arc<dyn IdempotencyStore>,
    clock: Arc<dyn Clock>,
    period: Duration,
    ttl_ms: i64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let cutoff_ms = clock.now_ms() - ttl_ms;
            match store.purge_older_than(cutoff_ms).await {
                Ok(removed) if removed > 0 => {
                    info!(removed, "purged stale idempotency records");
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(%error, "idempotency sweep failed; will retry on next tick");
                }
            }
        }
    })
}
