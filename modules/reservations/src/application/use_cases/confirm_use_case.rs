// ConfirmUseCase - consumes a hold, or expires it inline when the caller
// arrives too late

use std::sync::Arc;

use crate::application::dtos::commands::ConfirmCommand;
use crate::domain::clock::Clock;
use crate::domain::repositories::ReservationStore;
use crate::domain::value_objects::ReservationStatus;
use crate::infrastructure::cache::ItemCache;
use crate::EngineError;

/// Outcome of a confirm request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    /// Repeat of an earlier successful confirm; nothing mutated.
    AlreadyConfirmed,
    /// The hold was cancelled before the confirm arrived.
    Cancelled,
    /// The hold lapsed. When the confirm itself discovers the lapse, the
    /// expiry transition (including the stock refund) runs inline, so a
    /// late confirm never leaks stock.
    Expired,
    /// No reservation with this id owned by this user.
    NotFound,
}

/// Use case for confirming a reservation.
///
/// Classification reads the row, then applies a guarded write whose
/// predicate re-checks status and deadline. A guarded write that touches
/// zero rows means another actor transitioned the hold first; the loop
/// re-reads and reclassifies. Transitions out of `reserved` are one-way,
/// so this terminates.
pub struct ConfirmUseCase {
    store: Arc<dyn ReservationStore>,
    cache: Arc<ItemCache>,
    clock: Arc<dyn Clock>,
}

impl ConfirmUseCase {
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

    pub async fn execute(&self, command: ConfirmCommand) -> Result<ConfirmOutcome, EngineError> {
        loop {
            let Some(reservation) = self
                .store
                .find_reservation_owned(&command.reservation_id, &command.user_id)
                .await?
            else {
                return Ok(ConfirmOutcome::NotFound);
            };

            match reservation.status() {
                ReservationStatus::Confirmed => return Ok(ConfirmOutcome::AlreadyConfirmed),
                ReservationStatus::Cancelled => return Ok(ConfirmOutcome::Cancelled),
                ReservationStatus::Expired => return Ok(ConfirmOutcome::Expired),
                ReservationStatus::Reserved => {
                    let now_ms = self.clock.now_ms();
                    if reservation.is_lapsed_at(now_ms) {
                        if self
                            .store
                            .release_reserved(
                                &command.reservation_id,
                                ReservationStatus::Expired,
                                now_ms,
                            )
                            .await?
                        {
                            self.cache.invalidate_item(reservation.item_id());
                            return Ok(ConfirmOutcome::Expired);
                        }
                    } else if self
                        .store
                        .mark_confirmed(&command.reservation_id, &command.user_id, now_ms)
                        .await?
                    {
                        self.cache.invalidate_item(reservation.item_id());
                        return Ok(ConfirmOutcome::Confirmed);
                    }
                    // Lost a race against another transition; reclassify.
                }
            }
        }
    }
}
