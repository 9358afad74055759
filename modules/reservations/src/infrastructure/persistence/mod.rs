// PostgreSQL persistence

mod pg_idempotency_store;
mod pg_reservation_store;

pub use pg_idempotency_store::PgIdempotencyStore;
pub use pg_reservation_store::PgReservationStore;

/// Embedded schema migrations, run by the binaries at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
