// IdempotencyStore trait - cached responses for retry-safe mutations

use async_trait::async_trait;

use crate::EngineError;

/// Stored response for a retryable mutation, keyed by
/// `(key, route, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyRecord {
    pub key: String,
    pub route: String,
    pub user_id: String,
    pub response_status: u16,
    /// Serialized response body, replayed byte-for-byte.
    pub response_body: String,
    pub created_at: i64,
}

#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    /// Returns the stored record when one exists with
    /// `created_at >= oldest_created_at`. Older records read as absent.
    async fn find_fresh(
        &self,
        key: &str,
        route: &str,
        user_id: &str,
        oldest_created_at: i64,
    ) -> Result<Option<IdempotencyRecord>, EngineError>;

    /// Inserts the record for a first successful response. A concurrent
    /// duplicate insert for the same composite key is a no-op.
    async fn insert(&self, record: &IdempotencyRecord) -> Result<(), EngineError>;

    /// Deletes records created before `cutoff_ms`. Returns the count
    /// removed.
    async fn purge_older_than(&self, cutoff_ms: i64) -> Result<u64, EngineError>;
}
