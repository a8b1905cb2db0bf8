//! Cache statistics collection.
//!
//! Each cache owns one [`CacheStats`] record. Counters only grow while
//! operations are handled and return to zero on reset.

use serde::Serialize;

/// Per-cache access counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Loads (data cache) or instruction fetches (instruction cache).
    pub reads: u64,
    /// Stores. Always zero for the instruction cache.
    pub writes: u64,
    /// Accesses that found a valid line.
    pub hits: u64,
    /// Accesses that had to fetch from L2.
    pub misses: u64,
    /// Dirty lines written back to L2, by eviction or back-invalidation.
    pub writebacks: u64,
}

impl CacheStats {
    /// Total accesses classified as hit or miss.
    #[inline]
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of accesses that hit.
    ///
    /// # Returns
    ///
    /// `hits / (hits + misses)`, or `None` when no access has been made.
    pub fn hit_ratio(&self) -> Option<f64> {
        match self.accesses() {
            0 => None,
            total => Some(self.hits as f64 / total as f64),
        }
    }

    /// Zeroes every counter.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
