// ListUserReservationsUseCase - a user's holds, optionally by status

use std::sync::Arc;

use crate::application::dtos::responses::ReservationResponse;
use crate::domain::repositories::ReservationStore;
use crate::domain::value_objects::ReservationStatus;
use crate::EngineError;

/// Served directly from the store; reservation reads are never cached.
pub struct ListUserReservationsUseCase {
    store: Arc<dyn ReservationStore>,
}

impl ListUserReservationsUseCase {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<ReservationResponse>, EngineError> {
        Ok(self
            .store
            .list_reservations_for_user(user_id, status)
            .await?
            .iter()
            .map(ReservationResponse::from)
            .collect())
    }
}
