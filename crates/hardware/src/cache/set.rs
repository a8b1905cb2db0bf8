//! Cache Set.
//!
//! A set is the unit of associative search: a fixed row of `W` lines and
//! the LRU stack that ranks them. Lines are never allocated or freed during
//! simulation; only their occupancy changes.

use super::line::CacheLine;
use super::lru::LruStack;

/// One associative set: `W` line slots plus their recency ranking.
#[derive(Clone, Debug)]
pub struct CacheSet {
    lines: Box<[CacheLine]>,
    lru: LruStack,
}

impl CacheSet {
    /// Creates an empty set with `ways` unoccupied lines.
    pub fn new(ways: usize) -> Self {
        Self {
            lines: vec![CacheLine::default(); ways].into_boxed_slice(),
            lru: LruStack::new(ways),
        }
    }

    /// Associativity of the set.
    #[inline]
    pub fn ways(&self) -> usize {
        self.lines.len()
    }

    /// Line stored in `way`.
    #[inline]
    pub fn line(&self, way: usize) -> &CacheLine {
        &self.lines[way]
    }

    #[inline]
    pub(crate) fn line_mut(&mut self, way: usize) -> &mut CacheLine {
        &mut self.lines[way]
    }

    /// All lines, indexed by way.
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// The set's recency stack.
    pub fn lru(&self) -> &LruStack {
        &self.lru
    }

    pub(crate) fn lru_mut(&mut self) -> &mut LruStack {
        &mut self.lru
    }

    /// Finds the way carrying `tag`.
    ///
    /// Matches valid lines and back-invalidated lines that still carry the
    /// tag, so a block dropped by L2 is refilled into the slot it left.
    ///
    /// # Returns
    ///
    /// The matching way, or `None` if no way carries `tag`.
    pub fn find(&self, tag: u16) -> Option<usize> {
        self.lines.iter().position(|line| line.tag == tag)
    }

    /// First way that has never been filled since reset.
    pub fn first_unoccupied(&self) -> Option<usize> {
        self.lines.iter().position(CacheLine::is_unoccupied)
    }

    /// First way that holds no valid block, whatever its tag.
    pub fn first_invalid(&self) -> Option<usize> {
        self.lines.iter().position(|line| !line.valid)
    }

    /// Returns `true` if two valid lines carry the same tag.
    pub fn has_duplicate_tags(&self) -> bool {
        self.lines.iter().enumerate().any(|(i, a)| {
            a.valid
                && self.lines[i + 1..]
                    .iter()
                    .any(|b| b.valid && b.tag == a.tag)
        })
    }

    /// Clears every line and restores the identity ranking.
    pub fn reset(&mut self) {
        self.lines.fill(CacheLine::default());
        self.lru.reset();
    }
}
