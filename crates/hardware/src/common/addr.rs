//! Cache Address Decoding.
//!
//! This module splits 32-bit byte addresses into the fields the cache indexes by.
//! It provides the following:
//! 1. **Decoding:** `decode` maps an address to its tag, set index and byte offset.
//! 2. **Composition:** `DecodedAddr::compose` is the exact inverse, used for diagnostics.
//! 3. **Block Alignment:** Helpers for the base address of the block an address falls in.

use serde::Serialize;

use super::constants::{BYTE_BIT, BYTE_MASK, SET_MASK, TAG_SHIFT};

/// An address split into its cache fields.
///
/// With the default layout the fields partition the address as
/// `tag[31:20] | set[19:6] | offset[5:0]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DecodedAddr {
    /// High-order bits identifying the block within its set (12 significant bits).
    pub tag: u16,
    /// Index of the set the block maps to.
    pub set: u16,
    /// Byte offset within the line.
    pub offset: u8,
}

impl DecodedAddr {
    /// Reassembles the decoded 32-bit address.
    ///
    /// # Returns
    ///
    /// `tag << 20 | set << 6 | offset`.
    #[inline]
    pub fn compose(&self) -> u32 {
        (u32::from(self.tag) << TAG_SHIFT)
            | (u32::from(self.set) << BYTE_BIT)
            | u32::from(self.offset)
    }

    /// Index of the set as a `usize`, ready for table lookups.
    #[inline(always)]
    pub fn set_index(&self) -> usize {
        self.set as usize
    }

    /// Base address of the 64-byte block this address belongs to.
    #[inline]
    pub fn block_base(&self) -> u32 {
        self.compose() & !BYTE_MASK
    }
}

/// Decodes a 32-bit address into tag, set index and byte offset.
///
/// Pure and total: every `u32` decodes, and `decode(a).compose() == a`.
///
/// # Arguments
///
/// * `address` - The byte address to split.
///
/// # Returns
///
/// The [`DecodedAddr`] holding the three fields.
#[inline]
pub fn decode(address: u32) -> DecodedAddr {
    DecodedAddr {
        tag: (address >> TAG_SHIFT) as u16,
        set: ((address >> BYTE_BIT) & SET_MASK) as u16,
        offset: (address & BYTE_MASK) as u8,
    }
}
