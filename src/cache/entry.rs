//! Cache Entry Module
//!
//! Defines the unit of storage held by the recency list.

use std::fmt;

use serde::Serialize;

// == Entry ==
/// A single key/value pair stored in the cache.
///
/// Entries have no identity outside the cache: they are created by `put` and
/// dropped on explicit removal, eviction or expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Unique key within the cache
    pub key: u32,
    /// The stored value
    pub value: String,
}

impl Entry {
    // == Constructor ==
    /// Creates a new entry.
    pub fn new(key: u32, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}
