// Reservations module - stock holds, confirmation, cancellation, and expiry
//
// Clean Architecture layers:
// - domain: Core business logic, entities, value objects, store traits
// - application: Use cases with tagged outcomes, DTOs, background tasks
// - infrastructure: External implementations (PostgreSQL store, in-memory
//   store, TTL read cache)

pub mod application;
pub mod domain;
pub mod infrastructure;

mod error;

// =============================================================================
// Public API - Re-exports for convenient access
// =============================================================================

// Error type
pub use error::EngineError;

// Domain layer
pub use domain::clock::{Clock, ManualClock, SystemClock};
pub use domain::entities::{Item, Reservation};
pub use domain::repositories::{
    ExpiredBatch, IdempotencyRecord, IdempotencyStore, ReservationStore, ReserveWrite,
};
pub use domain::value_objects::{Quantity, ReservationId, ReservationStatus, SortBy, SortOrder};

// Application layer
pub use application::background::{spawn_expiration_worker, spawn_idempotency_janitor};
pub use application::dtos::commands::{CancelCommand, ConfirmCommand, ReserveCommand};
pub use application::dtos::responses::{ItemResponse, ReservationResponse};
pub use application::use_cases::{
    CancelOutcome, CancelUseCase, ConfirmOutcome, ConfirmUseCase, ExpireReservationsResult,
    ExpireReservationsUseCase, GetItemUseCase, GetReservationUseCase, ListItemsUseCase,
    ListUserReservationsUseCase, ReserveOutcome, ReserveUseCase,
};

// Infrastructure layer
pub use infrastructure::cache::ItemCache;
pub use infrastructure::memory::MemoryStore;
pub use infrastructure::persistence::{PgIdempotencyStore, PgReservationStore, MIGRATOR};
