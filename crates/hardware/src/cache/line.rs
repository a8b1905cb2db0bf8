//! Cache line metadata and MESI projection.

use std::fmt;

use serde::Serialize;

use crate::common::{CacheKind, UNOCCUPIED_TAG};

/// Cache line entry containing tag, validity, and dirty bits.
///
/// No data is modeled. `address` is the full address of the last access
/// that touched the line and is what write-back messages carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheLine {
    /// Block tag, or [`UNOCCUPIED_TAG`] if never filled since reset.
    pub tag: u16,
    /// Line holds a usable copy of the block.
    pub valid: bool,
    /// Line was written since it was filled. Always false in the instruction cache.
    pub dirty: bool,
    /// Address of the last occupant access.
    pub address: u32,
}

impl Default for CacheLine {
    fn default() -> Self {
        Self {
            tag: UNOCCUPIED_TAG,
            valid: false,
            dirty: false,
            address: 0,
        }
    }
}

impl CacheLine {
    /// Returns `true` if the line has not been filled since the last reset.
    #[inline]
    pub fn is_unoccupied(&self) -> bool {
        self.tag == UNOCCUPIED_TAG
    }

    /// Overwrites the line with a freshly fetched block.
    #[inline]
    pub(crate) fn install(&mut self, tag: u16, address: u32, dirty: bool) {
        *self = Self {
            tag,
            valid: true,
            dirty,
            address,
        };
    }

    /// Drops the line's copy of the block, keeping its tag.
    ///
    /// A later access to the same tag finds the line and refills it in place.
    #[inline]
    pub(crate) fn invalidate(&mut self, address: u32) {
        self.valid = false;
        self.dirty = false;
        self.address = address;
    }

    /// MESI state of the line in a cache of the given kind.
    pub fn mesi(&self, kind: CacheKind) -> Mesi {
        match (self.valid, self.dirty, kind) {
            (false, _, _) => Mesi::Invalid,
            (true, _, CacheKind::Instruction) => Mesi::Shared,
            (true, true, CacheKind::Data) => Mesi::Modified,
            (true, false, CacheKind::Data) => Mesi::Exclusive,
        }
    }
}

/// MESI line state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Mesi {
    /// Valid and written since fill; must be written back before reuse.
    Modified,
    /// Valid, clean, and the only L1 copy.
    Exclusive,
    /// Valid and clean; instruction lines are always shared.
    Shared,
    /// No usable copy.
    Invalid,
}

impl Mesi {
    /// Single-letter state code.
    pub fn letter(self) -> char {
        match self {
            Self::Modified => 'M',
            Self::Exclusive => 'E',
            Self::Shared => 'S',
            Self::Invalid => 'I',
        }
    }
}

impl fmt::Display for Mesi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
