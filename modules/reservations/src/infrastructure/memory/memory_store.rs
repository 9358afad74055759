// In-memory store - single-mutex implementation of the store traits
//
// Backs the unit and integration test suites and local development runs.
// A single mutex over the whole state gives every trait method the same
// all-or-nothing behavior the PostgreSQL implementation gets from
// transactions.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::entities::{Item, Reservation};
use crate::domain::repositories::{
    ExpiredBatch, IdempotencyRecord, IdempotencyStore, ReservationStore, ReserveWrite,
};
use crate::domain::value_objects::{ReservationStatus, SortBy, SortOrder};
use crate::EngineError;

#[derive(Default)]
struct MemoryInner {
    items: HashMap<String, Item>,
    reservations: HashMap<String, Reservation>,
    idempotency: HashMap<(String, String, String), IdempotencyRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds or replaces an item.
    pub fn put_item(&self, item: Item) {
        let mut inner = self.inner.lock().unwrap();
        inner.items.insert(item.id().to_string(), item);
    }

    /// Number of reservation rows, for test assertions.
    pub fn reservation_count(&self) -> usize {
        self.inner.lock().unwrap().reservations.len()
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn ping(&self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn find_item(&self, item_id: &str) -> Result<Option<Item>, EngineError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.items.get(item_id).cloned())
    }

    async fn list_items(
        &self,
        sort_by: SortBy,
        sort_order: SortOrder,
    ) -> Result<Vec<Item>, EngineError> {
        let inner = self.inner.lock().unwrap();
        let mut items: Vec<Item> = inner.items.values().cloned().collect();
        items.sort_by(|a, b| {
            let ordering = match sort_by {
                SortBy::Name => a.name().cmp(b.name()),
                SortBy::AvailableQty => a.available_qty().cmp(&b.available_qty()),
            };
            let ordering = match sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id().cmp(b.id()))
        });
        Ok(items)
    }

    async fn insert_reserved(&self, reservation: &Reservation) -> Result<ReserveWrite, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        let now_ms = reservation.created_at();
        let Some(item) = inner.items.get_mut(reservation.item_id()) else {
            return Ok(ReserveWrite::NoSuchItem);
        };
        if !item.try_adjust(-reservation.qty(), now_ms) {
            let available = item.available_qty();
            return Ok(ReserveWrite::Insufficient { available });
        }
        inner
            .reservations
            .insert(reservation.id().to_string(), reservation.clone());
        Ok(ReserveWrite::Created)
    }

    async fn find_reservation(&self, id: &str) -> Result<Option<Reservation>, EngineError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.reservations.get(id).cloned())
    }

    async fn find_reservation_owned(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Reservation>, EngineError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .reservations
            .get(id)
            .filter(|r| r.user_id() == user_id)
            .cloned())
    }

    async fn list_reservations_for_user(
        &self,
        user_id: &str,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>, EngineError> {
        let inner = self.inner.lock().unwrap();
        let mut reservations: Vec<Reservation> = inner
            .reservations
            .values()
            .filter(|r| r.user_id() == user_id)
            .filter(|r| status.is_none_or(|s| r.status() == s))
            .cloned()
            .collect();
        reservations.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().as_str().cmp(b.id().as_str()))
        });
        Ok(reservations)
    }

    async fn mark_confirmed(
        &self,
        id: &str,
        user_id: &str,
        now_ms: i64,
    ) -> Result<bool, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(reservation) = inner.reservations.get_mut(id) else {
            return Ok(false);
        };
        if reservation.user_id() != user_id {
            return Ok(false);
        }
        Ok(reservation.confirm(now_ms))
    }

    async fn release_reserved(
        &self,
        id: &str,
        to: ReservationStatus,
        now_ms: i64,
    ) -> Result<bool, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(reservation) = inner.reservations.get_mut(id) else {
            return Ok(false);
        };
        let applied = match to {
            ReservationStatus::Cancelled => reservation.cancel(now_ms),
            ReservationStatus::Expired => reservation.expire(now_ms),
            _ => false,
        };
        if !applied {
            return Ok(false);
        }
        let (item_id, qty) = (reservation.item_id().to_string(), reservation.qty());
        if let Some(item) = inner.items.get_mut(&item_id) {
            item.try_adjust(qty, now_ms);
        }
        Ok(true)
    }

    async fn mark_cancelled_no_refund(&self, id: &str, now_ms: i64) -> Result<bool, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(reservation) = inner.reservations.get_mut(id) else {
            return Ok(false);
        };
        Ok(reservation.cancel_expired(now_ms))
    }

    async fn expire_due(&self, now_ms: i64) -> Result<ExpiredBatch, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        let due: Vec<String> = inner
            .reservations
            .values()
            .filter(|r| r.status() == ReservationStatus::Reserved && r.is_lapsed_at(now_ms))
            .map(|r| r.id().to_string())
            .collect();

        let mut batch = ExpiredBatch::default();
        for id in due {
            let Some(reservation) = inner.reservations.get_mut(&id) else {
                continue;
            };
            if !reservation.expire(now_ms) {
                continue;
            }
            let (item_id, qty) = (reservation.item_id().to_string(), reservation.qty());
            if let Some(item) = inner.items.get_mut(&item_id) {
                item.try_adjust(qty, now_ms);
            }
            batch.count += 1;
            batch.item_ids.push(item_id);
        }
        Ok(batch)
    }
}

#[async_trait]
impl IdempotencyStore for MemoryStore {
    async fn find_fresh(
        &self,
        key: &str,
        route: &str,
        user_id: &str,
        oldest_created_at: i64,
    ) -> Result<Option<IdempotencyRecord>, EngineError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .idempotency
            .get(&(key.to_string(), route.to_string(), user_id.to_string()))
            .filter(|r| r.created_at >= oldest_created_at)
            .cloned())
    }

    async fn insert(&self, record: &IdempotencyRecord) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .idempotency
            .entry((
                record.key.clone(),
                record.route.clone(),
                record.user_id.clone(),
            ))
            .or_insert_with(|| record.clone());
        Ok(())
    }

    async fn purge_older_than(&self, cutoff_ms: i64) -> Result<u64, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.idempotency.len();
        inner.idempotency.retain(|_, r| r.created_at >= cutoff_ms);
        Ok((before - inner.idempotency.len()) as u64)
    }
}
