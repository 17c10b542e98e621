//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! Only construction can fail. A missing key or an empty cache is reported
//! through `Option` results, never through this type.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Explicit or derived capacity is zero
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// A TTL was requested but no tokio runtime is available to run timers
    #[error("No async runtime available to schedule expirations")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::InvalidCapacity(0).to_string(),
            "Invalid capacity: 0 (must be at least 1)"
        );
        assert!(CacheError::NoRuntime.to_string().contains("runtime"));
    }
}
