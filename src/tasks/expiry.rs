//! TTL Expiry Task
//!
//! Builds the callback a scheduler runs when an entry's TTL has elapsed.

use std::sync::Weak;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::LruCache;
use crate::tasks::Task;

/// Returns a task that expires `key` from the cache when run.
///
/// The task holds only a weak reference, so a pending expiry never keeps a
/// dropped cache alive. Running it after the cache is gone, or after the key
/// was already removed, does nothing.
///
/// Expiry checks presence, not identity: if the key was written again after
/// this task was scheduled, the newer entry is removed.
pub fn expiry_task(cache: Weak<Mutex<LruCache>>, key: u32) -> Task {
    Box::new(move || {
        let Some(cache) = cache.upgrade() else {
            trace!(key, "cache dropped before expiry fired");
            return;
        };

        let removed = cache.lock().expire(key);
        if removed.is_some() {
            debug!(key, "entry expired");
        } else {
            trace!(key, "expiry found no entry");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn shared_cache(keys: &[u32]) -> Arc<Mutex<LruCache>> {
        let mut cache = LruCache::new(10).unwrap();
        for &key in keys {
            cache.put(key, format!("value{}", key));
        }
        Arc::new(Mutex::new(cache))
    }

    #[test]
    fn test_expiry_removes_present_key() {
        let cache = shared_cache(&[1, 2]);

        expiry_task(Arc::downgrade(&cache), 1)();

        let guard = cache.lock();
        assert!(!guard.contains(1));
        assert!(guard.contains(2));
        assert_eq!(guard.stats().expirations, 1);
    }

    #[test]
    fn test_expiry_absent_key_is_noop() {
        let cache = shared_cache(&[2]);

        expiry_task(Arc::downgrade(&cache), 1)();
        expiry_task(Arc::downgrade(&cache), 1)();

        let guard = cache.lock();
        assert_eq!(guard.keys(), vec![2]);
        assert_eq!(guard.stats().expirations, 0);
    }

    #[test]
    fn test_expiry_after_cache_dropped() {
        let cache = shared_cache(&[1]);
        let task = expiry_task(Arc::downgrade(&cache), 1);

        drop(cache);

        // Must not panic
        task();
    }
}
