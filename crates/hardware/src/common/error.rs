//! Error definitions.
//!
//! This module defines the typed failures surfaced by the simulator. It provides:
//! 1. **Cache Errors:** Anomalies the cache engine detects while handling an access.
//! 2. **Configuration Errors:** Rejected or unreadable configuration files.
//! 3. **Simulation Errors:** Trace I/O failures and engine errors raised during replay.
//!
//! The engine never papers over these conditions; the caller decides which of
//! them end a run.

use std::io;

use thiserror::Error;

use super::data::{AccessType, CacheKind};

/// Anomalies detected by the cache engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CacheError {
    /// No way of the set holds rank 0, so no victim can be chosen.
    ///
    /// The recency ranking is no longer a permutation. This never happens
    /// while the stack is only updated through `touch`.
    #[error("LRU stack of set {set} is corrupted: no way of {ways} holds rank 0")]
    CorruptedLru {
        /// Set whose stack is corrupted.
        set: usize,
        /// Associativity of the set.
        ways: usize,
    },

    /// A back-invalidation named a block that no L1 line carries.
    ///
    /// Only raised under the strict inclusion policy.
    #[error("inclusion violation: block {address:#010x} is not present in L1")]
    InclusionViolation {
        /// Address named by the back-invalidation.
        address: u32,
    },

    /// A store was issued to the read-only instruction cache.
    #[error("write to read-only instruction cache at {address:#010x}")]
    ReadOnly {
        /// Address of the rejected store.
        address: u32,
    },

    /// The access type is not serviced by this cache.
    #[error("{access} access cannot be serviced by the {kind} cache")]
    WrongCache {
        /// The cache that received the access.
        kind: CacheKind,
        /// The access it cannot service.
        access: AccessType,
    },
}

/// Errors raised while loading or validating a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A cache was configured with an unsupported associativity.
    #[error("{kind} cache: {ways} ways is outside the supported range 1..={max}")]
    InvalidWays {
        /// Cache the setting belongs to.
        kind: CacheKind,
        /// Requested associativity.
        ways: usize,
        /// Largest supported associativity.
        max: usize,
    },

    /// The configuration file could not be read.
    #[error("cannot read config file: {0}")]
    Io(#[from] io::Error),

    /// The configuration file is not valid JSON for [`Config`](crate::config::Config).
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while replaying a trace.
#[derive(Debug, Error)]
pub enum SimError {
    /// The trace file could not be opened or read.
    #[error("trace I/O error: {0}")]
    Io(#[from] io::Error),

    /// The cache engine reported an anomaly.
    #[error("line {line}: {source}")]
    Cache {
        /// One-based trace line number of the failing event.
        line: usize,
        /// The engine error.
        #[source]
        source: CacheError,
    },
}
