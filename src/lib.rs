//! lru_ttl - A fixed-capacity in-memory cache
//!
//! Provides O(1) lookups with least-recently-used eviction and optional
//! per-entry TTL expiration.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, Entry, LruCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{ManualScheduler, Scheduler, TokioScheduler};
