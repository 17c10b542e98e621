//! Cache Module
//!
//! Provides a fixed-capacity in-memory cache with LRU eviction and optional
//! TTL expiration.

mod entry;
mod lru;
mod shared;
mod sizing;
mod stats;
mod store;


// Re-export public types
pub use entry::Entry;
pub use lru::{Iter, NodeHandle, RecencyList};
pub use shared::Cache;
pub use sizing::{capacity_for_budget, AVERAGE_ENTRY_OVERHEAD_BYTES};
pub use stats::CacheStats;
pub use store::LruCache;
