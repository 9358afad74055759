// CancelUseCase - releases a hold and returns its stock

use std::sync::Arc;

use crate::application::dtos::commands::CancelCommand;
use crate::domain::clock::Clock;
use crate::domain::repositories::ReservationStore;
use crate::domain::value_objects::ReservationStatus;
use crate::infrastructure::cache::ItemCache;
use crate::EngineError;

/// Outcome of a cancel request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    /// Repeat of an earlier cancel; nothing mutated.
    AlreadyCancelled,
    /// Confirmed stock is consumed and not refundable here.
    AlreadyConfirmed,
    /// No reservation with this id owned by this user.
    NotFound,
}

/// Use case for cancelling a reservation.
///
/// An active hold is cancelled with its stock refunded in the same store
/// transaction. A hold that already lapsed is still moved to `cancelled`,
/// but without a second refund; the expiry transition returned the stock.
pub struct CancelUseCase {
    store: Arc<dyn ReservationStore>,
    cache: Arc<ItemCache>,
    clock: Arc<dyn Clock>,
}

impl CancelUseCase {
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

    pub async fn execute(&self, command: CancelCommand) -> Result<CancelOutcome, EngineError> {
        loop {
            let Some(reservation) = self
                .store
                .find_reservation_owned(&command.reservation_id, &command.user_id)
                .await?
            else {
                return Ok(CancelOutcome::NotFound);
            };

            let now_ms = self.clock.now_ms();
            match reservation.status() {
                ReservationStatus::Cancelled => return Ok(CancelOutcome::AlreadyCancelled),
                ReservationStatus::Confirmed => return Ok(CancelOutcome::AlreadyConfirmed),
                ReservationStatus::Reserved => {
                    if self
                        .store
                        .release_reserved(
                            &command.reservation_id,
                            ReservationStatus::Cancelled,
                            now_ms,
                        )
                        .await?
                    {
                        self.cache.invalidate_item(reservation.item_id());
                        return Ok(CancelOutcome::Cancelled);
                    }
                    // Another transition won; reclassify.
                }
                ReservationStatus::Expired => {
                    if self
                        .store
                        .mark_cancelled_no_refund(&command.reservation_id, now_ms)
                        .await?
                    {
                        return Ok(CancelOutcome::Cancelled);
                    }
                }
            }
        }
    }
}
