//! Memory Access Types.
//!
//! This module defines the classification of accesses and caches used throughout the simulator.
//! These types are used for the following:
//! 1. **Routing:** Deciding which L1 cache services an access.
//! 2. **Write Policy:** Rejecting stores to the read-only instruction cache.
//! 3. **Reporting:** Labelling messages and statistics by cache.

use std::fmt;

use serde::Serialize;

/// Type of memory access operation.
///
/// Loads and stores go to the data cache, instruction fetches to the instruction cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AccessType {
    /// Instruction fetch access.
    Fetch,

    /// Data read access (load).
    Read,

    /// Data write access (store). Dirties the line it lands in.
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "FETCH"),
            Self::Read => write!(f, "READ"),
            Self::Write => write!(f, "WRITE"),
        }
    }
}

/// Which half of the split L1 a cache instance models.
///
/// The kind fixes the write policy: data lines are write-back with a dirty bit,
/// instruction lines are read-only and never dirty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CacheKind {
    /// L1 data cache (write-back, write-allocate).
    Data,
    /// L1 instruction cache (read-only).
    Instruction,
}

impl CacheKind {
    /// Returns `true` if this cache accepts the given access type.
    pub fn accepts(self, access: AccessType) -> bool {
        matches!(
            (self, access),
            (Self::Data, AccessType::Read | AccessType::Write)
                | (Self::Instruction, AccessType::Fetch)
        )
    }

    /// Short label used in console messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Data => "DATA",
            Self::Instruction => "INSTR",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
