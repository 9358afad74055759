// Infrastructure layer - store implementations and the read cache

pub mod cache;
pub mod memory;
pub mod persistence;
