// ExpireReservationsUseCase - batch transition of lapsed holds

use std::sync::Arc;

use crate::domain::clock::Clock;
use crate::domain::repositories::ReservationStore;
use crate::infrastructure::cache::ItemCache;
use crate::EngineError;

/// Result of one batch expiry pass.
#[derive(Debug, Clone, Default)]
pub struct ExpireReservationsResult {
    /// Number of reservations transitioned to `expired`.
    pub expired_count: u64,
}

/// Use case for expiring every lapsed hold and returning its stock.
///
/// Invoked once at startup (recovering from holds that lapsed during
/// downtime) and periodically by the expiration worker. The store-side
/// `status = reserved` predicate makes repeated runs harmless.
pub struct ExpireReservationsUseCase {
    store: Arc<dyn ReservationStore>,
    cache: Arc<ItemCache>,
    clock: Arc<dyn Clock>,
}

impl ExpireReservationsUseCase {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        cache: Arc<ItemCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            cache,
            clock,
        }
    }

    pub async fn execute(&self) -> Result<ExpireReservationsResult, EngineError> {
        let batch = self.store.expire_due(self.clock.now_ms()).await?;
        for item_id in &batch.item_ids {
            self.cache.invalidate_item(item_id);
        }
        Ok(ExpireReservationsResult {
            expired_count: batch.count,
        })
    }
}
