// PostgreSQL IdempotencyStore implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::repositories::{IdempotencyRecord, IdempotencyStore};
use crate::EngineError;

/// PostgreSQL implementation of IdempotencyStore
pub struct PgIdempotencyStore {
    pool: PgPool,
}

impl PgIdempotencyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdempotencyStore for PgIdempotencyStore {
    async fn find_fresh(
        &self,
        key: &str,
        route: &str,
        user_id: &str,
        oldest_created_at: i64,
    ) -> Result<Option<IdempotencyRecord>, EngineError> {
        let row = sqlx::query_as::<_, IdempotencyRow>(
            r#"
            SELECT key, route, user_id, response_status, response_body, created_at
            FROM idempotency_keys
            WHERE key = $1 AND route = $2 AND user_id = $3 AND created_at >= $4
            "#,
        )
        .bind(key)
        .bind(route)
        .bind(user_id)
        .bind(oldest_created_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(IdempotencyRecord::from))
    }

    async fn insert(&self, record: &IdempotencyRecord) -> Result<(), EngineError> {
        // First writer wins; a racing duplicate is a no-op.
        sqlx::query(
            r#"
            INSERT INTO idempotency_keys (key, route, user_id, response_status, response_body, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (key, route, user_id) DO NOTHING
            "#,
        )
        .bind(&record.key)
        .bind(&record.route)
        .bind(&record.user_id)
        .bind(record.response_status as i16)
        .bind(&record.response_body)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn purge_older_than(&self, cutoff_ms: i64) -> Result<u64, EngineError> {
        let result = sqlx::query("DELETE FROM idempotency_keys WHERE created_at < $1")
            .bind(cutoff_ms)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Internal row type for mapping idempotency database results
#[derive(sqlx::FromRow)]
struct IdempotencyRow {
    key: String,
    route: String,
    user_id: String,
    response_status: i16,
    response_body: String,
    created_at: i64,
}

impl From<IdempotencyRow> for IdempotencyRecord {
    fn from(row: IdempotencyRow) -> Self {
        Self {
            key: row.key,
            route: row.route,
            user_id: row.user_id,
            response_status: row.response_status as u16,
            response_body: row.response_body,
            created_at: row.created_at,
        }
    }
}
