//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by the cache engine, the
//! hierarchy and the trace driver. It includes:
//! 1. **Address Decoding:** Splitting 32-bit addresses into tag, set and offset.
//! 2. **Constants:** The fixed address layout and default geometry.
//! 3. **Access Types:** Classification of accesses and of the two L1 caches.
//! 4. **Error Handling:** Typed cache, configuration and simulation errors.

/// Address decoding (tag / set / offset).
pub mod addr;

/// Address layout and geometry constants.
pub mod constants;

/// Access type and cache kind definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{DecodedAddr, decode};
pub use constants::{NUM_SETS, UNOCCUPIED_TAG};
pub use data::{AccessType, CacheKind};
pub use error::{CacheError, ConfigError, SimError};
