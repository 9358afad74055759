// Reservations module errors

use thiserror::Error;

/// Failures that can escape the engine. Business outcomes (out of stock,
/// expired, wrong status) are not errors; use cases report those as tagged
/// outcome values.
#[derive(Debug, Error)]
pub enum EngineError {
    // Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
