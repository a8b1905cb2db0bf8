//! Least Recently Used (LRU) Recency Stack.
//!
//! Each set keeps a rank for every way. Ranks form a permutation of
//! `0..W`: rank `W-1` is the most recently used way, rank `0` the least
//! recently used one and therefore the victim.
//!
//! # Update rule
//!
//! Touching a way with old rank `r` decrements every way ranked above `r`
//! and gives the touched way rank `W-1`. Ways ranked below `r` keep their
//! rank, so the relative order of all untouched ways is preserved and the
//! ranks stay a permutation.
//!
//! # Performance
//!
//! - **Time Complexity:** `touch()` and `victim()` are O(W)
//! - **Space Complexity:** one byte per way

use crate::common::CacheError;

/// Recency ranking over the ways of one set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LruStack {
    /// `ranks[way]` is the recency rank of `way`.
    ranks: Box<[u8]>,
}

impl LruStack {
    /// Creates a stack in the initial (identity) state: way `i` has rank `i`.
    ///
    /// # Arguments
    ///
    /// * `ways` - Associativity of the set.
    pub fn new(ways: usize) -> Self {
        Self {
            ranks: (0..ways).map(|w| w as u8).collect(),
        }
    }

    /// Number of ways ranked by this stack.
    #[inline]
    pub fn ways(&self) -> usize {
        self.ranks.len()
    }

    /// Current rank of `way` (`ways() - 1` is most recently used).
    #[inline]
    pub fn rank(&self, way: usize) -> u8 {
        self.ranks[way]
    }

    /// All ranks, indexed by way.
    pub fn ranks(&self) -> &[u8] {
        &self.ranks
    }

    /// Marks `way` as most recently used.
    pub fn touch(&mut self, way: usize) {
        let old = self.ranks[way];
        for rank in self.ranks.iter_mut() {
            if *rank > old {
                *rank -= 1;
            }
        }
        self.ranks[way] = (self.ranks.len() - 1) as u8;
    }

    /// Returns the least recently used way.
    ///
    /// # Arguments
    ///
    /// * `set` - Index of the owning set, carried into the error.
    ///
    /// # Returns
    ///
    /// The way holding rank 0, or [`CacheError::CorruptedLru`] if no way does.
    pub fn victim(&self, set: usize) -> Result<usize, CacheError> {
        self.ranks
            .iter()
            .position(|&rank| rank == 0)
            .ok_or(CacheError::CorruptedLru {
                set,
                ways: self.ranks.len(),
            })
    }

    /// Returns `true` if every rank in `0..W` is held by exactly one way.
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; 256];
        for &rank in self.ranks.iter() {
            let slot = &mut seen[rank as usize];
            if rank as usize >= self.ranks.len() || *slot {
                return false;
            }
            *slot = true;
        }
        true
    }

    /// Restores the identity permutation.
    pub fn reset(&mut self) {
        for (way, rank) in self.ranks.iter_mut().enumerate() {
            *rank = way as u8;
        }
    }

    /// Overwrites the rank of one way without preserving the permutation.
    ///
    /// Only for fault-injection in tests; see [`LruStack::is_permutation`].
    #[doc(hidden)]
    pub fn force_rank(&mut self, way: usize, rank: u8) {
        self.ranks[way] = rank;
    }
}
