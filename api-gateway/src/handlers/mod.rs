// HTTP handlers

mod item_handlers;
mod reservation_handlers;
mod system_handlers;

pub use item_handlers::{get_item_handler, list_items_handler};
pub use reservation_handlers::{
    cancel_handler, confirm_handler, get_reservation_handler, list_user_reservations_handler,
    reserve_handler,
};
pub use system_handlers::{expire_run_handler, health_handler};
