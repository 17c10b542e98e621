//! Memory Budget Sizing
//!
//! Converts a byte budget into an entry count.

use crate::error::{CacheError, Result};

/// Rough per-entry cost in bytes, used to turn a memory budget into a capacity.
///
/// Approximates one key index slot, one list node with its two links, and a
/// value of about 128 characters stored as two bytes per character:
/// 28 (node) + 8 (bucket pointer) + 8 (bucket) + 256 (value) = 300.
///
/// This is an estimate. The cache never measures its real footprint, and short
/// or long values will move actual usage well away from the budget.
pub const AVERAGE_ENTRY_OVERHEAD_BYTES: usize = 300;

/// Returns `floor(budget_bytes / AVERAGE_ENTRY_OVERHEAD_BYTES)`.
///
/// Fails with [`CacheError::InvalidCapacity`] when the budget cannot hold a
/// single entry.
pub fn capacity_for_budget(budget_bytes: usize) -> Result<usize> {
    let capacity = budget_bytes / AVERAGE_ENTRY_OVERHEAD_BYTES;
    if capacity == 0 {
        return Err(CacheError::InvalidCapacity(capacity));
    }
    Ok(capacity)
}
