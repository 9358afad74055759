// Use cases - the engine's operation surface
//
// Each mutation returns a tagged outcome; business conflicts are values,
// not errors. `EngineError` is reserved for store failures.

mod cancel_use_case;
mod confirm_use_case;
mod expire_reservations_use_case;
mod get_item_use_case;
mod get_reservation_use_case;
mod list_items_use_case;
mod list_user_reservations_use_case;
mod reserve_use_case;

pub use cancel_use_case::{CancelOutcome, CancelUseCase};
pub use confirm_use_case::{ConfirmOutcome, ConfirmUseCase};
pub use expire_reservations_use_case::{ExpireReservationsResult, ExpireReservationsUseCase};
pub use get_item_use_case::GetItemUseCase;
pub use get_reservation_use_case::GetReservationUseCase;
pub use list_items_use_case::ListItemsUseCase;
pub use list_user_reservations_use_case::ListUserReservationsUseCase;
pub use reserve_use_case::{ReserveOutcome, ReserveUseCase};
