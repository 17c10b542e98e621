//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::Cache;
use crate::error::Result;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries, ignored when `memory_budget` is set
    pub capacity: usize,
    /// TTL in seconds applied to every put, None = entries never expire
    pub ttl_secs: Option<u64>,
    /// Memory budget in bytes used to derive the capacity
    pub memory_budget: Option<usize>,
    /// Seconds the demo waits before its final print
    pub demo_wait_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 3)
    /// - `CACHE_TTL_SECS` - Entry TTL in seconds; unset or negative disables expiry
    /// - `CACHE_MEMORY_BUDGET` - Memory budget in bytes (default: unset)
    /// - `DEMO_WAIT_SECS` - Demo wait before the final print (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            ttl_secs: parse_var::<i64>("CACHE_TTL_SECS")
                .and_then(|ttl| u64::try_from(ttl).ok()),
            memory_budget: parse_var("CACHE_MEMORY_BUDGET"),
            demo_wait_secs: parse_var("DEMO_WAIT_SECS").unwrap_or(defaults.demo_wait_secs),
        }
    }

    /// TTL as a duration.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }

    /// Builds a cache using the constructor these settings call for.
    ///
    /// A TTL requires a running tokio runtime.
    pub fn build_cache(&self) -> Result<Cache> {
        match (self.memory_budget, self.ttl()) {
            (Some(budget), ttl) => Cache::with_memory_budget(budget, ttl),
            (None, Some(ttl)) => Cache::with_ttl(self.capacity, ttl),
            (None, None) => Cache::new(self.capacity),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 3,
            ttl_secs: None,
            memory_budget: None,
            demo_wait_secs: 5,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
