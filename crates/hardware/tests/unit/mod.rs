//! # Unit Components
//!
//! This module serves as the central hub for the component tests of the
//! simulator, from address decoding up to whole-trace replay.






/// Unit tests for content and statistics reports.
pub mod report;

/// Unit tests for trace parsing and replay.
pub mod sim;
