// ItemCache - TTL-bounded read acceleration for item lookups
//
// Entries are snapshots only; writes are never served from here. Every
// stock-moving mutation calls `invalidate_item` synchronously before its
// response is returned, so a read issued after a mutation's response
// observes the new state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::application::dtos::responses::ItemResponse;
use crate::domain::clock::Clock;
use crate::domain::value_objects::{SortBy, SortOrder};

struct Entry<T> {
    value: T,
    expires_at: i64,
}

#[derive(Default)]
struct CacheInner {
    lists: HashMap<(SortBy, SortOrder), Entry<Vec<ItemResponse>>>,
    items: HashMap<String, Entry<ItemResponse>>,
}

pub struct ItemCache {
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
    inner: Mutex<CacheInner>,
}

impl ItemCache {
    pub fn new(clock: Arc<dyn Clock>, ttl_ms: i64) -> Self {
        Self {
            clock,
            ttl_ms,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn get_list(&self, sort_by: SortBy, sort_order: SortOrder) -> Option<Vec<ItemResponse>> {
        let now_ms = self.clock.now_ms();
        let mut inner = self.inner.lock().unwrap();
        match inner.lists.get(&(sort_by, sort_order)) {
            Some(entry) if entry.expires_at > now_ms => Some(entry.value.clone()),
            Some(_) => {
                inner.lists.remove(&(sort_by, sort_order));
                None
            }
            None => None,
        }
    }

    pub fn put_list(&self, sort_by: SortBy, sort_order: SortOrder, items: Vec<ItemResponse>) {
        let expires_at = self.clock.now_ms() + self.ttl_ms;
        let mut inner = self.inner.lock().unwrap();
        inner.lists.insert(
            (sort_by, sort_order),
            Entry {
                value: items,
                expires_at,
            },
        );
    }

    pub fn get_item(&self, item_id: &str) -> Option<ItemResponse> {
        let now_ms = self.clock.now_ms();
        let mut inner = self.inner.lock().unwrap();
        match inner.items.get(item_id) {
            Some(entry) if entry.expires_at > now_ms => Some(entry.value.clone()),
            Some(_) => {
                inner.items.remove(item_id);
                None
            }
            None => None,
        }
    }

    pub fn put_item(&self, item: ItemResponse) {
        let expires_at = self.clock.now_ms() + self.ttl_ms;
        let mut inner = self.inner.lock().unwrap();
        inner.items.insert(
            item.id.clone(),
            Entry {
                value: item,
                expires_at,
            },
        );
    }

    /// Drops the entry for `item_id` and every cached list. Called by the
    /// mutation paths whenever stock moves.
    pub fn invalidate_item(&self, item_id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.items.remove(item_id);
        inner.lists.clear();
    }

    /// Number of live entries, for health reporting.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.lists.len() + inner.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
