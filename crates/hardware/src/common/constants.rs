//! Cache Geometry Constants.
//!
//! This module defines the fixed address layout and default geometry of the
//! split L1. It includes:
//! 1. **Address Fields:** Widths and masks for the byte-offset, set-index and tag fields.
//! 2. **Geometry:** Set count and default associativity for each cache.
//! 3. **Sentinels:** The tag value marking a never-filled line.

/// Number of byte-offset bits (64-byte lines).
pub const BYTE_BIT: u32 = 6;

/// Number of set-index bits.
pub const SET_BIT: u32 = 14;

/// Number of tag bits. Offset, set and tag exactly partition a 32-bit address.
pub const TAG_BIT: u32 = 12;

/// Mask for the byte-offset field, before shifting.
pub const BYTE_MASK: u32 = (1 << BYTE_BIT) - 1;

/// Mask for the set-index field, after shifting right by [`BYTE_BIT`].
pub const SET_MASK: u32 = (1 << SET_BIT) - 1;

/// Shift that brings the tag field down to bit 0.
pub const TAG_SHIFT: u32 = BYTE_BIT + SET_BIT;

/// Number of sets in each cache (`2^SET_BIT`).
pub const NUM_SETS: usize = 1 << SET_BIT;

/// Line size in bytes.
pub const LINE_BYTES: usize = 1 << BYTE_BIT;

/// Tag carried by a line that has never been filled since the last reset.
///
/// One past the largest decodable tag, so no address can ever match it.
pub const UNOCCUPIED_TAG: u16 = 1 << TAG_BIT;

/// Default associativity of the L1 data cache.
pub const DATA_WAYS: usize = 4;

/// Default associativity of the L1 instruction cache.
pub const INSTRUCTION_WAYS: usize = 2;

/// Largest associativity accepted by the configuration.
pub const MAX_WAYS: usize = 8;
