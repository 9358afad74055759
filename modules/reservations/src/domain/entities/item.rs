// Item entity - a unit of finite inventory

use serde::{Deserialize, Serialize};

/// Inventory record. `available_qty` is the single authority for remaining
/// stock and never goes below zero at a committed point in time; every
/// mutation goes through the store's conditional delta primitives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    id: String,
    name: String,
    available_qty: i64,
    created_at: i64,
    updated_at: i64,
}

impl Item {
    /// Creates a fresh item with its initial stock.
    pub fn new(id: impl Into<String>, name: impl Into<String>, available_qty: i64, now_ms: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            available_qty,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Reconstitutes an Item from persistence.
    pub fn reconstitute(
        id: String,
        name: String,
        available_qty: i64,
        created_at: i64,
        updated_at: i64,
    ) -> Self {
        Self {
            id,
            name,
            available_qty,
            created_at,
            updated_at,
        }
    }

    /// Applies a stock delta when the result stays non-negative.
    /// Returns false (and leaves the item untouched) otherwise.
    pub(crate) fn try_adjust(&mut self, delta: i64, now_ms: i64) -> bool {
        let next = self.available_qty + delta;
        if next < 0 {
            return false;
        }
        self.available_qty = next;
        self.updated_at = now_ms;
        true
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn available_qty(&self) -> i64 {
        self.available_qty
    }
    pub fn created_at(&self) -> i64 {
        self.created_at
    }
    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_within_stock() {
        let mut item = Item::new("item_1", "Espresso Machine", 3, 1_000);
        assert!(item.try_adjust(-2, 2_000));
        assert_eq!(item.available_qty(), 1);
        assert_eq!(item.updated_at(), 2_000);
    }

    #[test]
    fn test_adjust_never_goes_negative() {
        let mut item = Item::new("item_1", "Espresso Machine", 1, 1_000);
        assert!(!item.try_adjust(-2, 2_000));
        assert_eq!(item.available_qty(), 1);
        assert_eq!(item.updated_at(), 1_000);
    }
}
