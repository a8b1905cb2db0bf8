//! Set-Associative L1 Cache.
//!
//! This module implements one half of the split L1: a table of `NUM_SETS`
//! associative sets, each with `W` ways ranked by an LRU stack. It models
//! hits, misses, victim selection and write-back of dirty victims, and tells
//! the backing store about every fetch and write-back through a
//! [`BackingStoreLink`]. Only metadata is tracked; no data moves.
//!
//! The same engine serves both caches. The [`CacheKind`] decides which
//! accesses are legal: the data cache takes reads and writes, the
//! instruction cache only fetches and never holds a dirty line.

/// Cache line metadata and MESI projection.
pub mod line;
/// Per-set LRU recency stack.
pub mod lru;
/// Associative set (lines plus LRU stack).
pub mod set;

use serde::Serialize;
use tracing::{debug, error, trace};

pub use self::line::{CacheLine, Mesi};
pub use self::lru::LruStack;
pub use self::set::CacheSet;

use crate::common::constants::MAX_WAYS;
use crate::common::{AccessType, CacheError, CacheKind, NUM_SETS, decode};
use crate::config::CacheConfig;
use crate::link::{BackingStoreLink, FetchIntent};
use crate::stats::CacheStats;

/// How an access was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Resolution {
    /// A valid line carried the tag. No traffic to L2.
    Hit,
    /// The tag was still present on a back-invalidated line; refilled in place.
    Refill,
    /// Installed into a way never filled since reset.
    Fill,
    /// Installed over an invalid line left by a back-invalidation of another block.
    Reuse,
    /// The set was full; the LRU line was evicted.
    Replace {
        /// Address of the evicted line.
        victim: u32,
        /// The victim was dirty and written back before the fetch.
        written_back: bool,
    },
}

/// Result of a single read, write or fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AccessOutcome {
    /// Cache that serviced the access.
    pub cache: CacheKind,
    /// Kind of access.
    pub access: AccessType,
    /// Accessed address.
    pub address: u32,
    /// Set the address maps to.
    pub set: usize,
    /// Way that now holds the block.
    pub way: usize,
    /// Path the access took.
    pub resolution: Resolution,
}

impl AccessOutcome {
    /// Returns `true` if the access hit.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.resolution == Resolution::Hit
    }
}

/// Result of dropping a block in response to a back-invalidation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Invalidation {
    /// Cache that held the block.
    pub cache: CacheKind,
    /// Set of the dropped line.
    pub set: usize,
    /// Way of the dropped line.
    pub way: usize,
    /// The line held a valid copy before the command.
    pub was_valid: bool,
    /// The line was dirty and written back first.
    pub written_back: bool,
}

/// One L1 cache: `NUM_SETS` sets of `ways` lines plus statistics.
#[derive(Clone, Debug)]
pub struct Cache {
    kind: CacheKind,
    ways: usize,
    sets: Box<[CacheSet]>,
    stats: CacheStats,
}

impl Cache {
    /// Creates an empty cache.
    ///
    /// # Arguments
    ///
    /// * `kind` - Data or instruction; fixes the write policy.
    /// * `ways` - Associativity of every set.
    ///
    /// # Panics
    ///
    /// Panics if `ways` is outside `1..=MAX_WAYS`. Configurations are
    /// checked by [`Config::validate`](crate::config::Config::validate)
    /// before any cache is built.
    pub fn new(kind: CacheKind, ways: usize) -> Self {
        assert!(
            (1..=MAX_WAYS).contains(&ways),
            "{kind} cache: {ways} ways is outside the supported range 1..={MAX_WAYS}"
        );
        Self {
            kind,
            ways,
            sets: (0..NUM_SETS).map(|_| CacheSet::new(ways)).collect(),
            stats: CacheStats::default(),
        }
    }

    /// Creates a data cache from its configuration.
    pub fn data(config: &CacheConfig) -> Self {
        Self::new(CacheKind::Data, config.ways)
    }

    /// Creates an instruction cache from its configuration.
    pub fn instruction(config: &CacheConfig) -> Self {
        Self::new(CacheKind::Instruction, config.ways)
    }

    /// Which half of the L1 this cache models.
    #[inline]
    pub fn kind(&self) -> CacheKind {
        self.kind
    }

    /// Associativity.
    #[inline]
    pub fn ways(&self) -> usize {
        self.ways
    }

    /// Current statistics.
    #[inline]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// The set at `index` (`index < NUM_SETS`).
    pub fn set(&self, index: usize) -> &CacheSet {
        &self.sets[index]
    }

    /// All sets, in index order.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// Data load. Fails with [`CacheError::WrongCache`] on the instruction cache.
    pub fn read(
        &mut self,
        address: u32,
        link: &mut dyn BackingStoreLink,
    ) -> Result<AccessOutcome, CacheError> {
        self.access(AccessType::Read, address, link)
    }

    /// Data store. Fails with [`CacheError::ReadOnly`] on the instruction cache.
    pub fn write(
        &mut self,
        address: u32,
        link: &mut dyn BackingStoreLink,
    ) -> Result<AccessOutcome, CacheError> {
        self.access(AccessType::Write, address, link)
    }

    /// Instruction fetch. Fails with [`CacheError::WrongCache`] on the data cache.
    pub fn fetch(
        &mut self,
        address: u32,
        link: &mut dyn BackingStoreLink,
    ) -> Result<AccessOutcome, CacheError> {
        self.access(AccessType::Fetch, address, link)
    }

    /// Accesses the cache for the specified address.
    ///
    /// Performs the lookup, updates the LRU stack, and on a miss installs
    /// the block, writing back a dirty victim first. Every miss sends
    /// exactly one fetch to `link`; hits send nothing.
    ///
    /// # Arguments
    ///
    /// * `access` - Read, write or fetch; must suit this cache's kind
    /// * `address` - The byte address accessed
    /// * `link` - Receiver of fetch and write-back messages
    ///
    /// # Returns
    ///
    /// The [`AccessOutcome`] describing the path taken, or a [`CacheError`]
    /// if the access is illegal for this cache or the set's LRU stack is
    /// corrupted.
    pub fn access(
        &mut self,
        access: AccessType,
        address: u32,
        link: &mut dyn BackingStoreLink,
    ) -> Result<AccessOutcome, CacheError> {
        let kind = self.kind;
        if !kind.accepts(access) {
            return Err(match access {
                AccessType::Write => CacheError::ReadOnly { address },
                _ => CacheError::WrongCache { kind, access },
            });
        }

        let decoded = decode(address);
        let set_index = decoded.set_index();
        let is_write = access == AccessType::Write;
        let intent = match access {
            AccessType::Read => FetchIntent::Read,
            AccessType::Write => FetchIntent::ReadForOwnership,
            AccessType::Fetch => FetchIntent::Instruction,
        };

        if is_write {
            self.stats.writes += 1;
        } else {
            self.stats.reads += 1;
        }

        let set = &mut self.sets[set_index];
        let outcome = |way, resolution| AccessOutcome {
            cache: kind,
            access,
            address,
            set: set_index,
            way,
            resolution,
        };

        if let Some(way) = set.find(decoded.tag) {
            let line = set.line_mut(way);
            if line.valid {
                self.stats.hits += 1;
                line.address = address;
                if is_write {
                    line.dirty = true;
                }
                set.lru_mut().touch(way);
                trace!(cache = %kind, %access, set = set_index, way, "hit <{address:#010x}>");
                return Ok(outcome(way, Resolution::Hit));
            }

            self.stats.misses += 1;
            line.install(decoded.tag, address, is_write);
            set.lru_mut().touch(way);
            link.fetch(address, intent);
            debug!(cache = %kind, %access, set = set_index, way, "refill after back-invalidation <{address:#010x}>");
            return Ok(outcome(way, Resolution::Refill));
        }

        self.stats.misses += 1;
        let (way, resolution) = if let Some(way) = set.first_unoccupied() {
            (way, Resolution::Fill)
        } else if let Some(way) = set.first_invalid() {
            (way, Resolution::Reuse)
        } else {
            let way = set.lru().victim(set_index).inspect_err(|e| {
                error!(cache = %kind, "{e}");
            })?;
            let victim = *set.line(way);
            let mut written_back = false;
            if victim.dirty {
                match kind {
                    CacheKind::Data => {
                        link.writeback(victim.address);
                        self.stats.writebacks += 1;
                        written_back = true;
                    }
                    CacheKind::Instruction => {
                        error!(
                            set = set_index,
                            way, "dirty line in instruction cache <{:#010x}>; treated as clean", victim.address
                        );
                    }
                }
            }
            debug!(
                cache = %kind, %access, set = set_index, way, written_back,
                "evict <{:#010x}> for <{address:#010x}>", victim.address
            );
            (
                way,
                Resolution::Replace {
                    victim: victim.address,
                    written_back,
                },
            )
        };

        set.line_mut(way).install(decoded.tag, address, is_write);
        set.lru_mut().touch(way);
        link.fetch(address, intent);
        trace!(cache = %kind, %access, set = set_index, way, "miss <{address:#010x}>");
        Ok(outcome(way, resolution))
    }

    /// Drops the block containing `address` if this cache holds its tag.
    ///
    /// A valid dirty line is written back first. The line keeps its tag so
    /// the next access to the block refills it in place. An acknowledgement
    /// is sent whenever a line carrying the tag was found.
    ///
    /// # Returns
    ///
    /// `None` if no line in the target set carries the tag.
    pub fn invalidate(
        &mut self,
        address: u32,
        link: &mut dyn BackingStoreLink,
    ) -> Option<Invalidation> {
        let decoded = decode(address);
        let set_index = decoded.set_index();
        let set = &mut self.sets[set_index];
        let way = set.find(decoded.tag)?;
        let line = set.line_mut(way);

        let was_valid = line.valid;
        let written_back = line.valid && line.dirty;
        if written_back {
            link.writeback(address);
            self.stats.writebacks += 1;
        }
        line.invalidate(address);
        link.invalidate_ack(address);
        debug!(cache = %self.kind, set = set_index, way, was_valid, written_back, "back-invalidate <{address:#010x}>");

        Some(Invalidation {
            cache: self.kind,
            set: set_index,
            way,
            was_valid,
            written_back,
        })
    }

    /// Clears every line to unoccupied, restores every LRU stack and zeroes the stats.
    pub fn reset(&mut self) {
        for set in self.sets.iter_mut() {
            set.reset();
        }
        self.stats.clear();
    }

    /// Returns `true` if no set holds two valid lines with the same tag and
    /// every LRU stack is a permutation.
    pub fn check_invariants(&self) -> bool {
        self.sets
            .iter()
            .all(|set| !set.has_duplicate_tags() && set.lru().is_permutation())
    }

    #[doc(hidden)]
    pub fn lru_mut(&mut self, set: usize) -> &mut LruStack {
        self.sets[set].lru_mut()
    }
}
