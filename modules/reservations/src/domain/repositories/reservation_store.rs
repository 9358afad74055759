// ReservationStore trait - transactional access to items and reservations
//
// Every write method below wraps exactly one ACID transaction, and every
// guarded transition carries its precondition into the write predicate.
// Two concurrent callers can therefore never both apply the same
// transition, and stock can never be decremented past zero: the engine
// relies on these predicates, not on in-process locks.

use async_trait::async_trait;

use crate::domain::entities::{Item, Reservation};
use crate::domain::value_objects::{ReservationStatus, SortBy, SortOrder};
use crate::EngineError;

/// Result of the conditional reserve write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveWrite {
    /// Stock decremented and reservation row inserted.
    Created,
    /// No item with the requested id.
    NoSuchItem,
    /// The stock predicate failed; carries the availability observed in the
    /// same transaction, for reporting.
    Insufficient { available: i64 },
}

/// Result of a batch expiry pass.
#[derive(Debug, Clone, Default)]
pub struct ExpiredBatch {
    /// Number of reservations transitioned to `expired`.
    pub count: u64,
    /// Item ids whose stock was refunded, one entry per reservation.
    pub item_ids: Vec<String>,
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Liveness probe for health reporting.
    async fn ping(&self) -> Result<(), EngineError>;

    async fn find_item(&self, item_id: &str) -> Result<Option<Item>, EngineError>;

    async fn list_items(
        &self,
        sort_by: SortBy,
        sort_order: SortOrder,
    ) -> Result<Vec<Item>, EngineError>;

    /// One transaction: conditional stock decrement
    /// (`available_qty >= qty`) plus insert of the reservation row.
    /// Nothing is written when the predicate fails.
    async fn insert_reserved(&self, reservation: &Reservation) -> Result<ReserveWrite, EngineError>;

    async fn find_reservation(&self, id: &str) -> Result<Option<Reservation>, EngineError>;

    /// Lookup scoped to the owning user. A mismatched owner reads as
    /// absent, so callers cannot distinguish the two.
    async fn find_reservation_owned(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Reservation>, EngineError>;

    async fn list_reservations_for_user(
        &self,
        user_id: &str,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>, EngineError>;

    /// Guarded `reserved -> confirmed`, predicated on ownership, current
    /// status, and `expires_at >= now`. Returns whether a row changed.
    async fn mark_confirmed(
        &self,
        id: &str,
        user_id: &str,
        now_ms: i64,
    ) -> Result<bool, EngineError>;

    /// One transaction: guarded `reserved -> to` (where `to` is
    /// `cancelled` or `expired`) plus the stock refund for the hold's
    /// quantity. Returns whether a row changed; the refund happens only
    /// when it did.
    async fn release_reserved(
        &self,
        id: &str,
        to: ReservationStatus,
        now_ms: i64,
    ) -> Result<bool, EngineError>;

    /// Guarded `expired -> cancelled` with no refund; the expiry
    /// transition already returned the stock.
    async fn mark_cancelled_no_refund(&self, id: &str, now_ms: i64) -> Result<bool, EngineError>;

    /// One transaction: transition every reservation with
    /// `status = reserved AND expires_at < now` to `expired` and refund
    /// each hold's stock. Idempotent across repeated runs.
    async fn expire_due(&self, now_ms: i64) -> Result<ExpiredBatch, EngineError>;
}
