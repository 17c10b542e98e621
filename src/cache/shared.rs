//! Shared Cache Handle
//!
//! Thread-safe, TTL-aware front end over [`LruCache`].
//!
//! One coarse lock guards the index and the recency list together, so every
//! operation is applied as a whole, whether it comes from a caller or from an
//! expiry timer firing on another thread.
//!
//! # Dropping
//! Expiry tasks hold only a weak reference to the cache. When the last clone
//! of a [`Cache`] built by [`Cache::with_ttl`] or [`Cache::with_memory_budget`]
//! is dropped, its tokio scheduler goes with it and every pending expiry is
//! cancelled. With an injected scheduler that outlives the cache, pending
//! expiries still fire but find no cache and do nothing.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{capacity_for_budget, CacheStats, Entry, LruCache};
use crate::error::Result;
use crate::tasks::{expiry_task, Scheduler, TokioScheduler};

// == Cache ==
/// Cloneable handle to a shared LRU cache with optional TTL expiry.
///
/// Clones share the same entries.
#[derive(Clone)]
pub struct Cache {
    inner: Arc<Mutex<LruCache>>,
    /// Applied to every `put`; None means entries never expire by time
    ttl: Option<Duration>,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl Cache {
    // == Constructors ==
    /// Creates a cache holding at most `capacity` entries, without TTL.
    ///
    /// # Errors
    /// [`crate::error::CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        let cache = Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity)?)),
            ttl: None,
            scheduler: None,
        };
        info!(capacity, "cache created");
        Ok(cache)
    }

    /// Creates a cache whose entries expire `ttl` after each `put`.
    ///
    /// Timers run on the current tokio runtime.
    ///
    /// # Errors
    /// [`crate::error::CacheError::InvalidCapacity`] if `capacity` is zero,
    /// [`crate::error::CacheError::NoRuntime`] outside of a tokio runtime.
    pub fn with_ttl(capacity: usize, ttl: Duration) -> Result<Self> {
        let scheduler = TokioScheduler::current()?;
        Self::with_scheduler(capacity, Some(ttl), Arc::new(scheduler))
    }

    /// Creates a cache sized from a memory budget in bytes.
    ///
    /// Capacity is `budget_bytes / AVERAGE_ENTRY_OVERHEAD_BYTES`. This is an
    /// estimate; actual memory use is not tracked or enforced.
    pub fn with_memory_budget(budget_bytes: usize, ttl: Option<Duration>) -> Result<Self> {
        let capacity = capacity_for_budget(budget_bytes)?;
        debug!(budget_bytes, capacity, "derived capacity from memory budget");

        match ttl {
            Some(ttl) => Self::with_ttl(capacity, ttl),
            None => Self::new(capacity),
        }
    }

    /// Creates a cache that hands expiry timers to `scheduler`.
    pub fn with_scheduler(
        capacity: usize,
        ttl: Option<Duration>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self> {
        let cache = Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity)?)),
            ttl,
            scheduler: Some(scheduler),
        };
        info!(capacity, ttl_ms = ttl.map(|t| t.as_millis() as u64), "cache created");
        Ok(cache)
    }

    // == Operations ==
    /// Retrieves a value and marks its key as most recently used.
    pub fn get(&self, key: u32) -> Option<String> {
        self.inner.lock().get(key)
    }

    /// Stores a value and, with a TTL configured, schedules its expiry.
    ///
    /// Each call schedules its own timer. Earlier timers for the same key are
    /// not cancelled; whichever fires first removes the key if it is present.
    /// Returns the entry evicted to make room, if any.
    pub fn put(&self, key: u32, value: impl Into<String>) -> Option<Entry> {
        let evicted = self.inner.lock().put(key, value);
        if let Some(entry) = &evicted {
            debug!(evicted = entry.key, inserted = key, "cache full, evicted oldest entry");
        }

        self.schedule_expiry(key);
        evicted
    }

    /// Removes a key and returns its value. Absent keys are a no-op.
    pub fn remove(&self, key: u32) -> Option<String> {
        self.inner.lock().remove(key)
    }

    /// Removes the least recently used entry and returns its value.
    pub fn remove_oldest(&self) -> Option<String> {
        self.inner.lock().remove_oldest()
    }

    /// Drops every entry. Pending expiries become no-ops.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    // == Inspection ==
    /// Snapshot of all entries from most to least recently used.
    pub fn entries(&self) -> Vec<Entry> {
        self.inner.lock().iter().cloned().collect()
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<u32> {
        self.inner.lock().keys()
    }

    // == Contains ==
    /// Checks if a key is present without touching recency order.
    pub fn contains(&self, key: u32) -> bool {
        self.inner.lock().contains(key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    // == Capacity ==
    /// Returns the maximum number of entries the cache can hold.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    // == TTL ==
    /// Returns the TTL applied to every put, None if entries never expire.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn schedule_expiry(&self, key: u32) {
        if let (Some(ttl), Some(scheduler)) = (self.ttl, &self.scheduler) {
            scheduler.schedule(ttl, expiry_task(Arc::downgrade(&self.inner), key));
        }
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("inner", &*self.inner.lock())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Renders `{3: str3, 2: str2, 1: str1}`, most recent first.
impl fmt::Display for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner.lock(), f)
    }
}
