//! Split L1 cache simulator library.
//!
//! This crate implements a trace-driven model of a split L1 (data and
//! instruction caches) above an abstract L2 with the following:
//! 1. **Cache engine:** Address decoding, associative lookup, stack LRU, victim selection and write-back.
//! 2. **Hierarchy:** Routing between the two caches, back-invalidation, reset and reports.
//! 3. **Link:** The `BackingStoreLink` through which L1 talks to L2.
//! 4. **Simulation:** Trace parsing, the event loop, configuration and statistics.

/// Set-associative cache engine (lines, sets, LRU stack).
pub mod cache;
/// Common types and constants (address decoding, access types, errors).
pub mod common;
/// Simulator configuration (defaults, enums, JSON loading).
pub mod config;
/// The split L1 hierarchy (data + instruction caches).
pub mod hierarchy;
/// L1 → L2 message link.
pub mod link;
/// Read-only content and statistics reports.
pub mod report;
/// Trace parsing and replay.
pub mod sim;
/// Per-cache statistics.
pub mod stats;

/// Root configuration type; use `Config::default()` or load JSON with `Config::from_file`.
pub use crate::config::Config;
/// The split L1; construct with `L1System::new`.
pub use crate::hierarchy::L1System;
/// Trace replay driver.
pub use crate::sim::Simulator;
