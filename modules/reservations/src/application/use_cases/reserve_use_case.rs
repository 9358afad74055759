// ReserveUseCase - places a new time-limited hold on stock

use std::sync::Arc;

use crate::application::dtos::commands::ReserveCommand;
use crate::application::dtos::responses::ReservationResponse;
use crate::domain::clock::Clock;
use crate::domain::entities::Reservation;
use crate::domain::repositories::{ReservationStore, ReserveWrite};
use crate::domain::value_objects::{Quantity, ReservationId};
use crate::infrastructure::cache::ItemCache;
use crate::EngineError;

/// Outcome of a reserve request.
#[derive(Debug, Clone)]
pub enum ReserveOutcome {
    /// Hold persisted; stock already decremented.
    Reserved(ReservationResponse),
    ItemNotFound,
    /// Stock predicate failed; carries the availability observed at write
    /// time, so the caller can decide whether to retry smaller.
    OutOfStock { available: i64 },
    /// Quantity outside the accepted band. The HTTP validator normally
    /// rejects these first; the engine re-checks defensively.
    InvalidQuantity { min: i64, max: i64 },
}

/// Use case for creating a reservation.
///
/// The conditional decrement inside `insert_reserved` is the sole
/// anti-oversell mechanism: there is no read-then-write window anywhere on
/// this path. Two concurrent requests for the last unit leave exactly one
/// with `Reserved` and the other with `OutOfStock`.
pub struct ReserveUseCase {
    store: Arc<dyn ReservationStore>,
    cache: Arc<ItemCache>,
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
}

impl ReserveUseCase {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        cache: Arc<ItemCache>,
        clock: Arc<dyn Clock>,
        ttl_ms: i64,
    ) -> Self {
        Self {
            store,
            cache,
            clock,
            ttl_ms,
        }
    }

    pub async fn execute(&self, command: ReserveCommand) -> Result<ReserveOutcome, EngineError> {
        let Some(qty) = Quantity::new(command.qty) else {
            return Ok(ReserveOutcome::InvalidQuantity {
                min: Quantity::MIN,
                max: Quantity::MAX,
            });
        };

        let reservation = Reservation::create(
            ReservationId::generate(),
            command.user_id,
            command.item_id,
            qty,
            self.clock.now_ms(),
            self.ttl_ms,
        );

        match self.store.insert_reserved(&reservation).await? {
            ReserveWrite::Created => {
                self.cache.invalidate_item(reservation.item_id());
                Ok(ReserveOutcome::Reserved(ReservationResponse::from(
                    &reservation,
                )))
            }
            ReserveWrite::NoSuchItem => Ok(ReserveOutcome::ItemNotFound),
            ReserveWrite::Insufficient { available } => {
                Ok(ReserveOutcome::OutOfStock { available })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::entities::Item;
    use crate::domain::value_objects::ReservationStatus;
    use crate::infrastructure::memory::MemoryStore;

    const TTL_MS: i64 = 600_000;

    fn fixture(stock: i64) -> (ReserveUseCase, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        store.put_item(Item::new("item_1", "Espresso Machine", stock, 0));
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = Arc::new(ItemCache::new(clock.clone(), 30_000));
        let use_case = ReserveUseCase::new(store.clone(), cache, clock.clone(), TTL_MS);
        (use_case, store, clock)
    }

    fn command(qty: i64) -> ReserveCommand {
        ReserveCommand {
            user_id: "user_1".to_string(),
            item_id: "item_1".to_string(),
            qty,
        }
    }

    #[tokio::test]
    async fn test_reserve_success() {
        let (use_case, store, _clock) = fixture(3);

        let outcome = use_case.execute(command(2)).await.unwrap();
        let ReserveOutcome::Reserved(response) = outcome else {
            panic!("expected Reserved, got {outcome:?}");
        };
        assert!(response.id.starts_with("res_"));
        assert_eq!(response.status, "reserved");
        assert_eq!(response.expires_at, 1_000 + TTL_MS);

        let item = store.find_item("item_1").await.unwrap().unwrap();
        assert_eq!(item.available_qty(), 1);
    }

    #[tokio::test]
    async fn test_reserve_unknown_item() {
        let (use_case, _store, _clock) = fixture(3);
        let outcome = use_case
            .execute(ReserveCommand {
                user_id: "user_1".to_string(),
                item_id: "missing".to_string(),
                qty: 1,
            })
            .await
            .unwrap();
        assert!(matches!(outcome, ReserveOutcome::ItemNotFound));
    }

    #[tokio::test]
    async fn test_reserve_out_of_stock_reports_available() {
        let (use_case, store, _clock) = fixture(1);
        let outcome = use_case.execute(command(2)).await.unwrap();
        assert!(matches!(outcome, ReserveOutcome::OutOfStock { available: 1 }));
        // Nothing was written.
        assert_eq!(store.reservation_count(), 0);
        let item = store.find_item("item_1").await.unwrap().unwrap();
        assert_eq!(item.available_qty(), 1);
    }

    #[tokio::test]
    async fn test_reserve_whole_stock_drives_it_to_zero() {
        let (use_case, store, _clock) = fixture(5);
        let outcome = use_case.execute(command(5)).await.unwrap();
        assert!(matches!(outcome, ReserveOutcome::Reserved(_)));
        let item = store.find_item("item_1").await.unwrap().unwrap();
        assert_eq!(item.available_qty(), 0);
    }

    #[tokio::test]
    async fn test_reserve_rejects_out_of_band_quantity() {
        let (use_case, store, _clock) = fixture(3);
        for qty in [0, 6, -1] {
            let outcome = use_case.execute(command(qty)).await.unwrap();
            assert!(
                matches!(outcome, ReserveOutcome::InvalidQuantity { min: 1, max: 5 }),
                "qty {qty} should be rejected"
            );
        }
        assert_eq!(store.reservation_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_reserves_for_last_unit() {
        let (use_case, store, _clock) = fixture(1);
        let use_case = Arc::new(use_case);

        let a = {
            let use_case = use_case.clone();
            tokio::spawn(async move {
                use_case
                    .execute(ReserveCommand {
                        user_id: "user_a".to_string(),
                        item_id: "item_1".to_string(),
                        qty: 1,
                    })
                    .await
                    .unwrap()
            })
        };
        let b = {
            let use_case = use_case.clone();
            tokio::spawn(async move {
                use_case
                    .execute(ReserveCommand {
                        user_id: "user_b".to_string(),
                        item_id: "item_1".to_string(),
                        qty: 1,
                    })
                    .await
                    .unwrap()
            })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        let wins = [&a, &b]
            .iter()
            .filter(|o| matches!(o, ReserveOutcome::Reserved(_)))
            .count();
        let losses = [&a, &b]
            .iter()
            .filter(|o| matches!(o, ReserveOutcome::OutOfStock { .. }))
            .count();
        assert_eq!((wins, losses), (1, 1));

        let item = store.find_item("item_1").await.unwrap().unwrap();
        assert_eq!(item.available_qty(), 0);
        assert_eq!(store.reservation_count(), 1);
    }

    #[tokio::test]
    async fn test_reserve_then_cancel_restores_stock() {
        let (use_case, store, clock) = fixture(3);
        let outcome = use_case.execute(command(2)).await.unwrap();
        let ReserveOutcome::Reserved(response) = outcome else {
            panic!("expected Reserved");
        };

        assert!(store
            .release_reserved(&response.id, ReservationStatus::Cancelled, clock.now_ms())
            .await
            .unwrap());
        let item = store.find_item("item_1").await.unwrap().unwrap();
        assert_eq!(item.available_qty(), 3);
    }
}
