// Reservation entity - a time-limited hold on stock

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Quantity, ReservationId, ReservationStatus};

/// A hold on `qty` units of one item by one user.
///
/// The transition methods enforce the state machine: `reserved` is the
/// initial state, `confirmed`/`cancelled`/`expired` are absorbing. Each
/// method returns whether the transition applied, leaving the entity
/// untouched when it did not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    user_id: String,
    item_id: String,
    qty: i64,
    status: ReservationStatus,
    expires_at: i64,
    created_at: i64,
    updated_at: i64,
}

impl Reservation {
    /// Creates a new hold in the `reserved` state expiring `ttl_ms` from now.
    pub fn create(
        id: ReservationId,
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        qty: Quantity,
        now_ms: i64,
        ttl_ms: i64,
    ) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            item_id: item_id.into(),
            qty: qty.get(),
            status: ReservationStatus::Reserved,
            expires_at: now_ms + ttl_ms,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Reconstitutes a Reservation from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ReservationId,
        user_id: String,
        item_id: String,
        qty: i64,
        status: ReservationStatus,
        expires_at: i64,
        created_at: i64,
        updated_at: i64,
    ) -> Self {
        Self {
            id,
            user_id,
            item_id,
            qty,
            status,
            expires_at,
            created_at,
            updated_at,
        }
    }

    /// `reserved -> confirmed`, only while the hold has not lapsed.
    pub fn confirm(&mut self, now_ms: i64) -> bool {
        if self.status != ReservationStatus::Reserved || now_ms > self.expires_at {
            return false;
        }
        self.status = ReservationStatus::Confirmed;
        self.updated_at = now_ms;
        true
    }

    /// `reserved -> cancelled`. The caller returns the stock.
    pub fn cancel(&mut self, now_ms: i64) -> bool {
        if self.status != ReservationStatus::Reserved {
            return false;
        }
        self.status = ReservationStatus::Cancelled;
        self.updated_at = now_ms;
        true
    }

    /// `reserved -> expired`. The caller returns the stock.
    pub fn expire(&mut self, now_ms: i64) -> bool {
        if self.status != ReservationStatus::Reserved {
            return false;
        }
        self.status = ReservationStatus::Expired;
        self.updated_at = now_ms;
        true
    }

    /// `expired -> cancelled`, without returning stock again; the expiry
    /// transition already did.
    pub fn cancel_expired(&mut self, now_ms: i64) -> bool {
        if self.status != ReservationStatus::Expired {
            return false;
        }
        self.status = ReservationStatus::Cancelled;
        self.updated_at = now_ms;
        true
    }

    /// True once the hold's deadline has passed, regardless of status.
    pub fn is_lapsed_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }

    pub fn id(&self) -> &ReservationId {
        &self.id
    }
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
    pub fn item_id(&self) -> &str {
        &self.item_id
    }
    pub fn qty(&self) -> i64 {
        self.qty
    }
    pub fn status(&self) -> ReservationStatus {
        self.status
    }
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }
    pub fn created_at(&self) -> i64 {
        self.created_at
    }
    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reserved(now_ms: i64, ttl_ms: i64) -> Reservation {
        Reservation::create(
            ReservationId::generate(),
            "user_1",
            "item_1",
            Quantity::new(2).unwrap(),
            now_ms,
            ttl_ms,
        )
    }

    #[test]
    fn test_create_sets_expiry() {
        let res = reserved(1_000, 600_000);
        assert_eq!(res.status(), ReservationStatus::Reserved);
        assert_eq!(res.expires_at(), 601_000);
        assert_eq!(res.qty(), 2);
    }

    #[test]
    fn test_confirm_before_expiry() {
        let mut res = reserved(1_000, 600_000);
        assert!(res.confirm(2_000));
        assert_eq!(res.status(), ReservationStatus::Confirmed);
    }

    #[test]
    fn test_confirm_after_expiry_refused() {
        let mut res = reserved(1_000, 600_000);
        assert!(!res.confirm(601_001));
        assert_eq!(res.status(), ReservationStatus::Reserved);
    }

    #[test]
    fn test_confirm_at_exact_deadline_allowed() {
        let mut res = reserved(1_000, 600_000);
        assert!(res.confirm(601_000));
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        let mut res = reserved(1_000, 600_000);
        assert!(res.confirm(2_000));
        assert!(!res.cancel(3_000));
        assert!(!res.expire(3_000));
        assert!(!res.confirm(3_000));
        assert_eq!(res.status(), ReservationStatus::Confirmed);

        let mut res = reserved(1_000, 600_000);
        assert!(res.cancel(2_000));
        assert!(!res.confirm(3_000));
        assert!(!res.expire(3_000));
        assert_eq!(res.status(), ReservationStatus::Cancelled);
    }

    #[test]
    fn test_expired_can_still_be_cancelled() {
        let mut res = reserved(1_000, 600_000);
        assert!(res.expire(700_000));
        assert!(res.cancel_expired(800_000));
        assert_eq!(res.status(), ReservationStatus::Cancelled);
    }

    #[test]
    fn test_cancel_expired_needs_expired_state() {
        let mut res = reserved(1_000, 600_000);
        assert!(!res.cancel_expired(2_000));
        assert_eq!(res.status(), ReservationStatus::Reserved);
    }
}
