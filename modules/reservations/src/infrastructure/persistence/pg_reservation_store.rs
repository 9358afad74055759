// PostgreSQL ReservationStore implementation
//
// Write methods run inside transactions; every guarded transition carries
// its precondition into the UPDATE's WHERE clause and checks rows_affected,
// so correctness does not depend on in-process locks or on SELECT-then-write
// sequences.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entities::{Item, Reservation};
use crate::domain::repositories::{ExpiredBatch, ReservationStore, ReserveWrite};
use crate::domain::value_objects::{ReservationId, ReservationStatus, SortBy, SortOrder};
use crate::EngineError;

/// PostgreSQL implementation of ReservationStore
pub struct PgReservationStore {
    pool: PgPool,
}

impl PgReservationStore {
    /// Creates a new PgReservationStore with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn ping(&self) -> Result<(), EngineError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_item(&self, item_id: &str) -> Result<Option<Item>, EngineError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, available_qty, created_at, updated_at
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    async fn list_items(
        &self,
        sort_by: SortBy,
        sort_order: SortOrder,
    ) -> Result<Vec<Item>, EngineError> {
        // Sort key and direction come from closed enums, never from input.
        let order_clause = match (sort_by, sort_order) {
            (SortBy::Name, SortOrder::Asc) => "name ASC",
            (SortBy::Name, SortOrder::Desc) => "name DESC",
            (SortBy::AvailableQty, SortOrder::Asc) => "available_qty ASC",
            (SortBy::AvailableQty, SortOrder::Desc) => "available_qty DESC",
        };
        let query = format!(
            r#"
            SELECT id, name, available_qty, created_at, updated_at
            FROM items
            ORDER BY {}, id ASC
            "#,
            order_clause
        );

        let rows = sqlx::query_as::<_, ItemRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn insert_reserved(&self, reservation: &Reservation) -> Result<ReserveWrite, EngineError> {
        let mut tx = self.pool.begin().await?;

        let decremented = sqlx::query(
            r#"
            UPDATE items
            SET available_qty = available_qty - $2, updated_at = $3
            WHERE id = $1 AND available_qty >= $2
            "#,
        )
        .bind(reservation.item_id())
        .bind(reservation.qty())
        .bind(reservation.created_at())
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            // The predicate failed: the item is missing or short on stock.
            // The read below is for reporting only; nothing was written.
            let available = sqlx::query_scalar::<_, i64>(
                "SELECT available_qty FROM items WHERE id = $1",
            )
            .bind(reservation.item_id())
            .fetch_optional(&mut *tx)
            .await?;

            return Ok(match available {
                None => ReserveWrite::NoSuchItem,
                Some(available) => ReserveWrite::Insufficient { available },
            });
        }

        sqlx::query(
            r#"
            INSERT INTO reservations (id, user_id, item_id, qty, status, expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(reservation.id().as_str())
        .bind(reservation.user_id())
        .bind(reservation.item_id())
        .bind(reservation.qty())
        .bind(reservation.status().to_string())
        .bind(reservation.expires_at())
        .bind(reservation.created_at())
        .bind(reservation.updated_at())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ReserveWrite::Created)
    }

    async fn find_reservation(&self, id: &str) -> Result<Option<Reservation>, EngineError> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT id, user_id, item_id, qty, status, expires_at, created_at, updated_at
            FROM reservations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Reservation::try_from).transpose()
    }

    async fn find_reservation_owned(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Reservation>, EngineError> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT id, user_id, item_id, qty, status, expires_at, created_at, updated_at
            FROM reservations
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Reservation::try_from).transpose()
    }

    async fn list_reservations_for_user(
        &self,
        user_id: &str,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>, EngineError> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, ReservationRow>(
                    r#"
                    SELECT id, user_id, item_id, qty, status, expires_at, created_at, updated_at
                    FROM reservations
                    WHERE user_id = $1 AND status = $2
                    ORDER BY created_at DESC, id ASC
                    "#,
                )
                .bind(user_id)
                .bind(status.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ReservationRow>(
                    r#"
                    SELECT id, user_id, item_id, qty, status, expires_at, created_at, updated_at
                    FROM reservations
                    WHERE user_id = $1
                    ORDER BY created_at DESC, id ASC
                    "#,
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Reservation::try_from).collect()
    }

    async fn mark_confirmed(
        &self,
        id: &str,
        user_id: &str,
        now_ms: i64,
    ) -> Result<bool, EngineError> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'confirmed', updated_at = $3
            WHERE id = $1 AND user_id = $2 AND status = 'reserved' AND expires_at >= $3
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(now_ms)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn release_reserved(
        &self,
        id: &str,
        to: ReservationStatus,
        now_ms: i64,
    ) -> Result<bool, EngineError> {
        debug_assert!(matches!(
            to,
            ReservationStatus::Cancelled | ReservationStatus::Expired
        ));

        let mut tx = self.pool.begin().await?;

        let released = sqlx::query_as::<_, (String, i64)>(
            r#"
            UPDATE reservations
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = 'reserved'
            RETURNING item_id, qty
            "#,
        )
        .bind(id)
        .bind(to.to_string())
        .bind(now_ms)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((item_id, qty)) = released else {
            return Ok(false);
        };

        sqlx::query(
            r#"
            UPDATE items
            SET available_qty = available_qty + $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(&item_id)
        .bind(qty)
        .bind(now_ms)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn mark_cancelled_no_refund(&self, id: &str, now_ms: i64) -> Result<bool, EngineError> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'cancelled', updated_at = $2
            WHERE id = $1 AND status = 'expired'
            "#,
        )
        .bind(id)
        .bind(now_ms)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn expire_due(&self, now_ms: i64) -> Result<ExpiredBatch, EngineError> {
        let mut tx = self.pool.begin().await?;

        let released = sqlx::query_as::<_, (String, i64)>(
            r#"
            UPDATE reservations
            SET status = 'expired', updated_at = $1
            WHERE status = 'reserved' AND expires_at < $1
            RETURNING item_id, qty
            "#,
        )
        .bind(now_ms)
        .fetch_all(&mut *tx)
        .await?;

        let mut refunds: HashMap<String, i64> = HashMap::new();
        for (item_id, qty) in &released {
            *refunds.entry(item_id.clone()).or_insert(0) += qty;
        }
        for (item_id, qty) in &refunds {
            sqlx::query(
                r#"
                UPDATE items
                SET available_qty = available_qty + $2, updated_at = $3
                WHERE id = $1
                "#,
            )
            .bind(item_id)
            .bind(qty)
            .bind(now_ms)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(ExpiredBatch {
            count: released.len() as u64,
            item_ids: released.into_iter().map(|(item_id, _)| item_id).collect(),
        })
    }
}

/// Internal row type for mapping item database results
#[derive(sqlx::FromRow)]
struct ItemRow {
    id: String,
    name: String,
    available_qty: i64,
    created_at: i64,
    updated_at: i64,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item::reconstitute(
            row.id,
            row.name,
            row.available_qty,
            row.created_at,
            row.updated_at,
        )
    }
}

/// Internal row type for mapping reservation database results
#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: String,
    user_id: String,
    item_id: String,
    qty: i64,
    status: String,
    expires_at: i64,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = EngineError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let status: ReservationStatus = row.status.parse().map_err(|()| {
            EngineError::Database(sqlx::Error::Decode(
                format!("invalid reservation status '{}'", row.status).into(),
            ))
        })?;

        Ok(Reservation::reconstitute(
            ReservationId::from_string(row.id),
            row.user_id,
            row.item_id,
            row.qty,
            status,
            row.expires_at,
            row.created_at,
            row.updated_at,
        ))
    }
}
