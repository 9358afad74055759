// GetItemUseCase - single item lookup with cache acceleration

use std::sync::Arc;

use crate::application::dtos::responses::ItemResponse;
use crate::domain::repositories::ReservationStore;
use crate::infrastructure::cache::ItemCache;
use crate::EngineError;

pub struct GetItemUseCase {
    store: Arc<dyn ReservationStore>,
    cache: Arc<ItemCache>,
}

impl GetItemUseCase {
    pub fn new(store: Arc<dyn ReservationStore>, cache: Arc<ItemCache>) -> Self {
        Self { store, cache }
    }

    pub async fn execute(&self, item_id: &str) -> Result<Option<ItemResponse>, EngineError> {
        if let Some(item) = self.cache.get_item(item_id) {
            return Ok(Some(item));
        }

        let Some(item) = self.store.find_item(item_id).await? else {
            return Ok(None);
        };
        let response = ItemResponse::from(&item);
        self.cache.put_item(response.clone());
        Ok(Some(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::entities::Item;
    use crate::infrastructure::memory::MemoryStore;

    fn fixture() -> (GetItemUseCase, Arc<MemoryStore>, Arc<ItemCache>) {
        let store = Arc::new(MemoryStore::new());
        store.put_item(Item::new("item_1", "Espresso Machine", 3, 0));
        let clock = Arc::new(ManualClock::new(0));
        let cache = Arc::new(ItemCache::new(clock, 30_000));
        (
            GetItemUseCase::new(store.clone(), cache.clone()),
            store,
            cache,
        )
    }

    #[tokio::test]
    async fn test_found_and_cached() {
        let (use_case, store, _cache) = fixture();
        assert_eq!(
            use_case.execute("item_1").await.unwrap().unwrap().available_qty,
            3
        );

        // Stale snapshot until invalidated.
        store.put_item(Item::new("item_1", "Espresso Machine", 1, 0));
        assert_eq!(
            use_case.execute("item_1").await.unwrap().unwrap().available_qty,
            3
        );
    }

    #[tokio::test]
    async fn test_missing_item() {
        let (use_case, _store, _cache) = fixture();
        assert!(use_case.execute("missing").await.unwrap().is_none());
    }
}
