//! Cache Store Module
//!
//! Main cache engine combining a key index with the recency list.
//!
//! `LruCache` is single-writer: it takes `&mut self` for anything that changes
//! recency order and does no locking of its own. Use [`crate::cache::Cache`]
//! when expiry timers or other threads need to reach the same instance.

use std::collections::HashMap;
use std::fmt;

use ahash::RandomState;
use tracing::trace;

use crate::cache::lru::{Iter, NodeHandle, RecencyList};
use crate::cache::{CacheStats, Entry};
use crate::error::{CacheError, Result};

/// Upper bound on slots reserved up front; larger caches grow on demand.
const MAX_PREALLOCATED_ENTRIES: usize = 4096;

// == LRU Cache ==
/// Fixed-capacity key/value store with least-recently-used eviction.
///
/// The index maps each key to the handle of its node in the recency list.
/// Both structures are updated together by every mutation, so a key is in the
/// index if and only if its entry is in the list.
pub struct LruCache {
    /// Key to list node
    index: HashMap<u32, NodeHandle, RandomState>,
    /// Owns the entries, most recent first
    list: RecencyList,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl LruCache {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        let reserve = capacity.min(MAX_PREALLOCATED_ENTRIES);
        Ok(Self {
            index: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
            list: RecencyList::with_capacity(reserve),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Get ==
    /// Retrieves a value and marks its key as most recently used.
    ///
    /// Returns None, with no other effect, if the key is absent.
    pub fn get(&mut self, key: u32) -> Option<String> {
        match self.index.get(&key).copied() {
            Some(handle) => {
                self.list.move_to_front(handle);
                self.stats.record_hit();
                self.list.get(handle).map(|entry| entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Reads a value without touching recency order or stats.
    pub fn peek(&self, key: u32) -> Option<&str> {
        let handle = self.index.get(&key)?;
        self.list.get(*handle).map(|entry| entry.value.as_str())
    }

    // == Contains ==
    /// Checks if a key is present without touching recency order.
    pub fn contains(&self, key: u32) -> bool {
        self.index.contains_key(&key)
    }

    // == Put ==
    /// Stores a value, counting the write as a use of the key.
    ///
    /// An existing key is overwritten in place and moved to the front. A new key
    /// arriving at a full cache first evicts exactly one least recently used
    /// entry, which is returned.
    pub fn put(&mut self, key: u32, value: impl Into<String>) -> Option<Entry> {
        let value = value.into();

        if let Some(handle) = self.index.get(&key).copied() {
            if let Some(entry) = self.list.get_mut(handle) {
                entry.value = value;
            }
            self.list.move_to_front(handle);
            trace!(key, "overwrote entry");
            return None;
        }

        let evicted = if self.list.len() >= self.capacity {
            let evicted = self.pop_oldest();
            if let Some(entry) = &evicted {
                self.stats.record_eviction();
                trace!(key = entry.key, "evicted least recently used entry");
            }
            evicted
        } else {
            None
        };

        let handle = self.list.push_front(Entry::new(key, value));
        self.index.insert(key, handle);
        self.stats.set_total_entries(self.index.len());
        evicted
    }

    // == Remove Oldest ==
    /// Removes the least recently used entry and returns its value.
    ///
    /// Returns None if the cache is empty.
    pub fn remove_oldest(&mut self) -> Option<String> {
        self.pop_oldest().map(|entry| entry.value)
    }

    // == Remove ==
    /// Removes a key and returns its value.
    ///
    /// Removing an absent key returns None and changes nothing, so calling this
    /// twice is safe.
    pub fn remove(&mut self, key: u32) -> Option<String> {
        let handle = self.index.remove(&key)?;
        let entry = self.list.remove(handle);
        self.stats.set_total_entries(self.index.len());
        entry.map(|entry| entry.value)
    }

    // == Expire ==
    /// Removes a key on behalf of a TTL timer.
    ///
    /// Same as [`LruCache::remove`], but a removal is counted as an expiration.
    pub fn expire(&mut self, key: u32) -> Option<String> {
        let value = self.remove(key);
        if value.is_some() {
            self.stats.record_expiration();
        }
        value
    }

    // == Clear ==
    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
        self.stats.set_total_entries(0);
    }

    // == Inspection ==
    /// Iterates entries from most to least recently used without reordering.
    pub fn iter(&self) -> Iter<'_> {
        self.list.iter()
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<u32> {
        self.iter().map(|entry| entry.key).collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Capacity ==
    /// Returns the maximum number of entries the cache can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn pop_oldest(&mut self) -> Option<Entry> {
        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);
        self.stats.set_total_entries(self.index.len());
        Some(entry)
    }

    /// Panics if the index and the list have drifted apart.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.index.len(), self.list.len(), "index/list size mismatch");
        assert!(self.list.len() <= self.capacity, "capacity exceeded");
        for (key, handle) in &self.index {
            let entry = self.list.get(*handle).expect("index points at a free slot");
            assert_eq!(entry.key, *key, "index points at the wrong node");
        }
    }
}

impl fmt::Debug for LruCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .field("keys", &self.keys())
            .finish()
    }
}

/// Renders `{3: str3, 2: str2, 1: str1}`, most recent first.
impl fmt::Display for LruCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, entry) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", entry)?;
        }
        f.write_str("}")
    }
}

impl<'a> IntoIterator for &'a LruCache {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with(capacity: usize, keys: &[u32]) -> LruCache {
        let mut cache = LruCache::new(capacity).unwrap();
        for &key in keys {
            cache.put(key, format!("str{}", key));
        }
        cache
    }

    #[test]
    fn test_store_new() {
        let cache = LruCache::new(3).unwrap();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 3);
    }

    #[test]
    fn test_store_zero_capacity_rejected() {
        let result = LruCache::new(0);
        assert!(matches!(result, Err(CacheError::InvalidCapacity(0))));
    }

    #[test]
    fn test_store_put_and_get() {
        let mut cache = LruCache::new(10).unwrap();

        assert!(cache.put(1, "value1").is_none());
        assert_eq!(cache.get(1), Some("value1".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut cache = cache_with(3, &[1, 2]);

        assert_eq!(cache.get(99), None);
        assert_eq!(cache.keys(), vec![2, 1]);
    }

    #[test]
    fn test_store_demo_scenario() {
        let mut cache = cache_with(3, &[1, 2, 3]);
        assert_eq!(cache.keys(), vec![3, 2, 1]);

        assert_eq!(cache.get(3), Some("str3".to_string()));
        assert_eq!(cache.get(2), Some("str2".to_string()));
        assert_eq!(cache.get(1), Some("str1".to_string()));
        assert_eq!(cache.keys(), vec![1, 2, 3]);

        assert_eq!(cache.get(3), Some("str3".to_string()));
        assert_eq!(cache.keys(), vec![3, 1, 2]);

        let evicted = cache.put(4, "str4");
        assert_eq!(evicted, Some(Entry::new(2, "str2")));
        assert_eq!(cache.keys(), vec![4, 3, 1]);
        assert_eq!(cache.get(2), None);
        assert_eq!(cache.to_string(), "{4: str4, 3: str3, 1: str1}");
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut cache = cache_with(3, &[1, 2, 3]);

        // Cache is full, adding 4 should evict 1 (oldest)
        cache.put(4, "str4");

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(1));
        assert_eq!(cache.stats().evictions, 1);
        cache.assert_consistent();
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut cache = cache_with(3, &[1, 2, 3]);

        // Access 1 to make it most recently used
        cache.get(1);

        // Adding 4 should evict 2 (now oldest)
        cache.put(4, "str4");

        assert!(cache.contains(1));
        assert!(!cache.contains(2));
    }

    #[test]
    fn test_store_overwrite_counts_as_use() {
        let mut cache = cache_with(3, &[1, 2, 3]);

        assert!(cache.put(1, "updated").is_none());
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.keys(), vec![1, 3, 2]);
        assert_eq!(cache.peek(1), Some("updated"));

        cache.put(4, "str4");
        assert!(!cache.contains(2));
        assert!(cache.contains(1));
    }

    #[test]
    fn test_store_peek_does_not_touch() {
        let mut cache = cache_with(2, &[1, 2]);

        assert_eq!(cache.peek(1), Some("str1"));
        cache.put(3, "str3");

        assert!(!cache.contains(1));
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_store_remove() {
        let mut cache = cache_with(3, &[1, 2, 3]);

        assert_eq!(cache.remove(2), Some("str2".to_string()));
        assert_eq!(cache.keys(), vec![3, 1]);
        cache.assert_consistent();
    }

    #[test]
    fn test_store_remove_is_idempotent() {
        let mut cache = cache_with(3, &[1, 2]);

        assert_eq!(cache.remove(1), Some("str1".to_string()));
        assert_eq!(cache.remove(1), None);
        assert_eq!(cache.remove(42), None);
        assert_eq!(cache.keys(), vec![2]);
    }

    #[test]
    fn test_store_remove_oldest() {
        let mut cache = cache_with(3, &[1, 2, 3]);

        assert_eq!(cache.remove_oldest(), Some("str1".to_string()));
        assert_eq!(cache.remove_oldest(), Some("str2".to_string()));
        assert_eq!(cache.remove_oldest(), Some("str3".to_string()));
        assert_eq!(cache.remove_oldest(), None);
        assert!(cache.is_empty());
        // Explicit removal is not an eviction
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_store_expire_counts_only_present_keys() {
        let mut cache = cache_with(3, &[1]);

        assert_eq!(cache.expire(1), Some("str1".to_string()));
        assert_eq!(cache.expire(1), None);
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_store_capacity_one() {
        let mut cache = LruCache::new(1).unwrap();

        cache.put(1, "a");
        let evicted = cache.put(2, "b");

        assert_eq!(evicted.map(|e| e.key), Some(1));
        assert_eq!(cache.keys(), vec![2]);
        cache.assert_consistent();
    }

    #[test]
    fn test_store_stats() {
        let mut cache = cache_with(10, &[1]);

        cache.get(1); // hit
        cache.get(2); // miss

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_clear() {
        let mut cache = cache_with(3, &[1, 2, 3]);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.to_string(), "{}");

        cache.put(5, "str5");
        assert_eq!(cache.keys(), vec![5]);
        cache.assert_consistent();
    }

    #[test]
    fn test_store_iteration_is_read_only() {
        let cache = cache_with(3, &[1, 2, 3]);

        let first: Vec<u32> = (&cache).into_iter().map(|e| e.key).collect();
        let second: Vec<u32> = cache.iter().map(|e| e.key).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![3, 2, 1]);
    }
}
