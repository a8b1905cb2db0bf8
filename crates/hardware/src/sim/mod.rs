//! Trace-driven simulation.
//!
//! This module turns trace files into cache operations. It provides:
//! 1. **Parsing:** A typed parser for `<op> <hex-address>` trace lines.
//! 2. **Driving:** The `Simulator`, which dispatches events to the split L1.

/// Trace line parsing and reading.
pub mod trace;

/// Event dispatch loop.
pub mod simulator;

pub use simulator::{RunSummary, Simulator, StepOutcome, TraceObserver};
pub use trace::{Operation, TraceEvent, TraceReader, parse_line};
