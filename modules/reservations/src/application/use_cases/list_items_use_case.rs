// ListItemsUseCase - catalog listing with cache acceleration

use std::sync::Arc;

use crate::application::dtos::responses::ItemResponse;
use crate::domain::repositories::ReservationStore;
use crate::domain::value_objects::{SortBy, SortOrder};
use crate::infrastructure::cache::ItemCache;
use crate::EngineError;

/// Use case for listing items. Serves from the TTL cache when a fresh
/// snapshot exists for the requested ordering.
pub struct ListItemsUseCase {
    store: Arc<dyn ReservationStore>,
    cache: Arc<ItemCache>,
}

impl ListItemsUseCase {
    pub fn new(store: Arc<dyn ReservationStore>, cache: Arc<ItemCache>) -> Self {
        Self { store, cache }
    }

    pub async fn execute(
        &self,
        sort_by: SortBy,
        sort_order: SortOrder,
    ) -> Result<Vec<ItemResponse>, EngineError> {
        if let Some(items) = self.cache.get_list(sort_by, sort_order) {
            return Ok(items);
        }

        let items: Vec<ItemResponse> = self
            .store
            .list_items(sort_by, sort_order)
            .await?
            .iter()
            .map(ItemResponse::from)
            .collect();
        self.cache.put_list(sort_by, sort_order, items.clone());
        Ok(items)
    }
}
