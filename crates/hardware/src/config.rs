//! Configuration system for the split L1 simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline associativity for the data and instruction caches.
//! 2. **Structures:** Per-cache geometry, display settings and the root `Config`.
//! 3. **Enums:** Inclusion policy, coherence model and display mode.
//!
//! Configuration is read from JSON (`--config` on the CLI) or built with
//! `Config::default()`. Command-line flags override file values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::constants::{DATA_WAYS, INSTRUCTION_WAYS, MAX_WAYS};
use crate::common::{CacheKind, ConfigError};

/// Default configuration constants for the simulator.
mod defaults {
    /// Associativity of the L1 data cache (4 ways).
    pub const DATA_WAYS: usize = super::DATA_WAYS;

    /// Associativity of the L1 instruction cache (2 ways).
    pub const INSTRUCTION_WAYS: usize = super::INSTRUCTION_WAYS;
}

/// How a back-invalidation of a block absent from L1 is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum InclusionPolicy {
    /// Absent blocks are a benign no-op.
    ///
    /// Independent caches may drop the same block, so L2 can legitimately
    /// ask L1 to evict something it no longer holds.
    #[default]
    Tolerant,
    /// Absent blocks are reported as an inclusion violation.
    Strict,
}

/// How line state is named and reported.
///
/// With one L1 per kind and no snoop bus both models carry the same
/// information; they differ in the state labels exposed in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum CoherenceModel {
    /// Valid and dirty bits.
    #[default]
    DirtyBit,
    /// MESI state letters.
    #[serde(alias = "MESI")]
    Mesi,
}

/// Console verbosity of the trace driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum DisplayMode {
    /// Cache content and statistics on report requests only.
    #[default]
    Summary,
    /// Summary plus every message exchanged between L1 and L2.
    Messages,
}

impl DisplayMode {
    /// Maps the numeric mode used on the command line (0 or 1).
    ///
    /// # Returns
    ///
    /// `None` for values other than 0 and 1.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Summary),
            1 => Some(Self::Messages),
            _ => None,
        }
    }
}

/// Individual cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Associativity (number of ways per set)
    pub ways: usize,
}

impl CacheConfig {
    /// Default data cache configuration (4 ways).
    pub fn data() -> Self {
        Self {
            ways: defaults::DATA_WAYS,
        }
    }

    /// Default instruction cache configuration (2 ways).
    pub fn instruction() -> Self {
        Self {
            ways: defaults::INSTRUCTION_WAYS,
        }
    }

    fn validate(&self, kind: CacheKind) -> Result<(), ConfigError> {
        if self.ways == 0 || self.ways > MAX_WAYS {
            return Err(ConfigError::InvalidWays {
                kind,
                ways: self.ways,
                max: MAX_WAYS,
            });
        }
        Ok(())
    }
}

/// General driver settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Console verbosity
    #[serde(default)]
    pub mode: DisplayMode,

    /// Also print read/fetch hits when messages are displayed
    #[serde(default)]
    pub hit_show: bool,

    /// Emit one more report after the last trace event
    #[serde(default)]
    pub final_report: bool,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use l1sim_core::config::{Config, InclusionPolicy};
///
/// let config = Config::default();
/// assert_eq!(config.data.ways, 4);
/// assert_eq!(config.instruction.ways, 2);
/// assert_eq!(config.inclusion, InclusionPolicy::Tolerant);
/// ```
///
/// Deserializing from JSON; omitted sections keep their defaults:
///
/// ```
/// use l1sim_core::config::{Config, CoherenceModel, DisplayMode, InclusionPolicy};
///
/// let json = r#"{
///     "inclusion": "Strict",
///     "coherence": "Mesi",
///     "general": { "mode": "Messages", "hit_show": true }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.inclusion, InclusionPolicy::Strict);
/// assert_eq!(config.coherence, CoherenceModel::Mesi);
/// assert_eq!(config.general.mode, DisplayMode::Messages);
/// assert_eq!(config.data.ways, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// L1 data cache
    #[serde(default = "CacheConfig::data")]
    pub data: CacheConfig,
    /// L1 instruction cache
    #[serde(default = "CacheConfig::instruction")]
    pub instruction: CacheConfig,
    /// Treatment of back-invalidations for absent blocks
    #[serde(default)]
    pub inclusion: InclusionPolicy,
    /// Line state naming in reports
    #[serde(default)]
    pub coherence: CoherenceModel,
    /// Driver settings
    #[serde(default)]
    pub general: GeneralConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: CacheConfig::data(),
            instruction: CacheConfig::instruction(),
            inclusion: InclusionPolicy::default(),
            coherence: CoherenceModel::default(),
            general: GeneralConfig::default(),
        }
    }
}

impl Config {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON file.
    ///
    /// # Returns
    ///
    /// The validated configuration, or the I/O, parse or validation error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks that both caches have a supported associativity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.data.validate(CacheKind::Data)?;
        self.instruction.validate(CacheKind::Instruction)
    }
}
