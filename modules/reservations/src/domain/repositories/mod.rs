// Store traits - the seams between the engine and its datastore

mod idempotency_store;
mod reservation_store;

pub use idempotency_store::{IdempotencyRecord, IdempotencyStore};
pub use reservation_store::{ExpiredBatch, ReservationStore, ReserveWrite};
