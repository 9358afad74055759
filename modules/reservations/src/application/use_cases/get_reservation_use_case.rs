// GetReservationUseCase - single reservation lookup

use std::sync::Arc;

use crate::application::dtos::responses::ReservationResponse;
use crate::domain::repositories::ReservationStore;
use crate::EngineError;

/// Served directly from the store; reservation reads are never cached.
pub struct GetReservationUseCase {
    store: Arc<dyn ReservationStore>,
}

impl GetReservationUseCase {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, id: &str) -> Result<Option<ReservationResponse>, EngineError> {
        Ok(self
            .store
            .find_reservation(id)
            .await?
            .as_ref()
            .map(ReservationResponse::from))
    }
}
