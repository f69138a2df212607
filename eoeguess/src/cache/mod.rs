//! Bounded in-memory image cache.
//!
//! [`ImageCache`] maps source keys to decoded image handles. It is a pure
//! accelerator: dropping every entry changes latency, never results.
//!
//! # Eviction
//!
//! Eviction is by insertion order, not access order. A cache hit does not
//! refresh an entry, so the entry evicted when the cache overflows is always
//! the one inserted longest ago.

mod bounded;

pub use bounded::{ImageCache, DEFAULT_CACHE_CAPACITY};

use std::fmt;

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found an entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
    /// Current number of entries.
    pub entry_count: usize,
    /// Configured capacity.
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups that hit, or 0.0 with no lookups.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} entries, {} hits, {} misses, {} evictions",
            self.entry_count, self.capacity, self.hits, self.misses, self.evictions
        )
    }
}
