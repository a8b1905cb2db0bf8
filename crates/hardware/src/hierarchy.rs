//! Split L1 Hierarchy.
//!
//! [`L1System`] owns the data and instruction caches and the settings that
//! span both. It provides:
//! 1. **Routing:** Loads and stores go to the data cache, fetches to the instruction cache.
//! 2. **Back-Invalidation:** L2-initiated evictions searched across both caches.
//! 3. **Reset and Report:** Whole-hierarchy reinitialization and read-only snapshots.
//!
//! Operations take `&mut self` and run to completion one at a time; a caller
//! sharing an `L1System` between threads wraps the whole value in one lock.

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{AccessOutcome, Cache, Invalidation};
use crate::common::{AccessType, CacheError, CacheKind};
use crate::config::{CoherenceModel, Config, InclusionPolicy};
use crate::link::BackingStoreLink;
use crate::report::Report;

/// Result of a back-invalidation command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EvictOutcome {
    /// A line carrying the block's tag was found and invalidated.
    Invalidated(Invalidation),
    /// Neither cache carried the tag; nothing was done.
    Absent,
}

/// The split L1: one data cache and one instruction cache above a shared L2.
#[derive(Clone, Debug)]
pub struct L1System {
    data: Cache,
    instruction: Cache,
    inclusion: InclusionPolicy,
    coherence: CoherenceModel,
}

impl L1System {
    /// Builds both caches from a configuration.
    ///
    /// The configuration is assumed validated (see [`Config::validate`]).
    ///
    /// # Panics
    ///
    /// Panics if either cache's associativity is outside the range accepted
    /// by [`Config::validate`].
    pub fn new(config: &Config) -> Self {
        Self {
            data: Cache::data(&config.data),
            instruction: Cache::instruction(&config.instruction),
            inclusion: config.inclusion,
            coherence: config.coherence,
        }
    }

    /// The data cache.
    pub fn data(&self) -> &Cache {
        &self.data
    }

    /// The instruction cache.
    pub fn instruction(&self) -> &Cache {
        &self.instruction
    }

    /// The cache of the given kind.
    pub fn cache(&self, kind: CacheKind) -> &Cache {
        match kind {
            CacheKind::Data => &self.data,
            CacheKind::Instruction => &self.instruction,
        }
    }

    /// Mutable access to the cache of the given kind.
    pub fn cache_mut(&mut self, kind: CacheKind) -> &mut Cache {
        match kind {
            CacheKind::Data => &mut self.data,
            CacheKind::Instruction => &mut self.instruction,
        }
    }

    /// Active inclusion policy.
    pub fn inclusion(&self) -> InclusionPolicy {
        self.inclusion
    }

    /// Active coherence model.
    pub fn coherence(&self) -> CoherenceModel {
        self.coherence
    }

    /// Data load.
    pub fn read(
        &mut self,
        address: u32,
        link: &mut dyn BackingStoreLink,
    ) -> Result<AccessOutcome, CacheError> {
        self.data.read(address, link)
    }

    /// Data store.
    pub fn write(
        &mut self,
        address: u32,
        link: &mut dyn BackingStoreLink,
    ) -> Result<AccessOutcome, CacheError> {
        self.data.write(address, link)
    }

    /// Instruction fetch.
    pub fn fetch(
        &mut self,
        address: u32,
        link: &mut dyn BackingStoreLink,
    ) -> Result<AccessOutcome, CacheError> {
        self.instruction.fetch(address, link)
    }

    /// Routes an access to the cache that services it.
    pub fn access(
        &mut self,
        access: AccessType,
        address: u32,
        link: &mut dyn BackingStoreLink,
    ) -> Result<AccessOutcome, CacheError> {
        match access {
            AccessType::Read | AccessType::Write => self.data.access(access, address, link),
            AccessType::Fetch => self.instruction.access(access, address, link),
        }
    }

    /// Handles an eviction command from L2.
    ///
    /// Searches the data cache first and the instruction cache only if the
    /// data cache does not carry the tag. A valid dirty line is written back
    /// before it is invalidated; the line keeps its tag.
    ///
    /// # Arguments
    ///
    /// * `address` - Address of the block L2 is dropping
    /// * `link` - Receiver of the write-back and acknowledgement
    ///
    /// # Returns
    ///
    /// The invalidated line, [`EvictOutcome::Absent`] if no line carries the
    /// tag under [`InclusionPolicy::Tolerant`], or
    /// [`CacheError::InclusionViolation`] under [`InclusionPolicy::Strict`].
    pub fn back_invalidate(
        &mut self,
        address: u32,
        link: &mut dyn BackingStoreLink,
    ) -> Result<EvictOutcome, CacheError> {
        let found = match self.data.invalidate(address, link) {
            Some(inv) => Some(inv),
            None => self.instruction.invalidate(address, link),
        };
        if let Some(inv) = found {
            return Ok(EvictOutcome::Invalidated(inv));
        }

        match self.inclusion {
            InclusionPolicy::Tolerant => {
                debug!("back-invalidate <{address:#010x}>: block not in L1");
                Ok(EvictOutcome::Absent)
            }
            InclusionPolicy::Strict => {
                let err = CacheError::InclusionViolation { address };
                warn!("{err}");
                Err(err)
            }
        }
    }

    /// Clears both caches and their statistics. Idempotent.
    pub fn reset(&mut self) {
        self.data.reset();
        self.instruction.reset();
        debug!("L1 reset");
    }

    /// Snapshot of both caches' statistics and valid lines.
    pub fn report(&self) -> Report {
        Report {
            coherence: self.coherence,
            data: self.data.report(),
            instruction: self.instruction.report(),
        }
    }
}
