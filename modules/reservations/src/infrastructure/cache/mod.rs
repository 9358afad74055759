mod item_cache;

pub use item_cache::ItemCache;
