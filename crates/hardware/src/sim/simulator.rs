//! Simulator: replays a trace against the split L1.
//!
//! The simulator owns the [`L1System`] and borrows the link and report sink
//! for the duration of a call, so the same caches can be driven by
//! different front-ends (console, tests, JSON output). Front-ends that print
//! per-event output implement [`TraceObserver`] and replay through
//! [`Simulator::run_observed`].

use std::io::BufRead;

use serde::Serialize;
use tracing::{debug, warn};

use super::trace::{Operation, TraceEvent, TraceReader};
use crate::cache::AccessOutcome;
use crate::common::{AccessType, CacheError, SimError};
use crate::config::Config;
use crate::hierarchy::{EvictOutcome, L1System};
use crate::link::{BackingStoreLink, FetchIntent};
use crate::report::ReportSink;

/// What a single trace event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StepOutcome {
    /// A read, write or fetch.
    Access(AccessOutcome),
    /// A back-invalidation.
    Evict(EvictOutcome),
    /// Both caches were cleared.
    Reset,
    /// A report was handed to the sink.
    Reported,
}

/// Link that is also told what each replayed event did.
///
/// The observer receives an event's L2 messages through its
/// [`BackingStoreLink`] methods before the event itself is reported.
pub trait TraceObserver: BackingStoreLink {
    /// Called after an event executed successfully.
    fn on_event(&mut self, _line: usize, _event: &TraceEvent, _outcome: &StepOutcome) {}

    /// Called when a back-invalidation was rejected under strict inclusion.
    fn on_inclusion_violation(&mut self, _line: usize, _address: u32) {}
}

/// Adapts a plain link for [`Simulator::run`].
struct Unobserved<'a>(&'a mut dyn BackingStoreLink);

impl BackingStoreLink for Unobserved<'_> {
    fn fetch(&mut self, address: u32, intent: FetchIntent) {
        self.0.fetch(address, intent);
    }

    fn writeback(&mut self, address: u32) {
        self.0.writeback(address);
    }

    fn invalidate_ack(&mut self, address: u32) {
        self.0.invalidate_ack(address);
    }
}

impl TraceObserver for Unobserved<'_> {}

/// Totals for one trace replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Events executed.
    pub events: usize,
    /// Back-invalidations rejected under the strict inclusion policy.
    pub inclusion_violations: usize,
}

/// Top-level simulator: the split L1 plus the trace dispatch loop.
#[derive(Clone, Debug)]
pub struct Simulator {
    l1: L1System,
}

impl Simulator {
    /// Creates a simulator with empty caches.
    pub fn new(config: &Config) -> Self {
        Self {
            l1: L1System::new(config),
        }
    }

    /// The simulated hierarchy.
    pub fn l1(&self) -> &L1System {
        &self.l1
    }

    /// Mutable access to the simulated hierarchy.
    pub fn l1_mut(&mut self) -> &mut L1System {
        &mut self.l1
    }

    /// Executes one event.
    ///
    /// # Arguments
    ///
    /// * `event` - The event to execute
    /// * `link` - Receiver of L1 → L2 messages
    /// * `sink` - Receiver of reports
    pub fn step(
        &mut self,
        event: TraceEvent,
        link: &mut dyn BackingStoreLink,
        sink: &mut dyn ReportSink,
    ) -> Result<StepOutcome, CacheError> {
        let TraceEvent { op, address } = event;
        match op {
            Operation::Read => self.access(AccessType::Read, address, link),
            Operation::Write => self.access(AccessType::Write, address, link),
            Operation::Fetch => self.access(AccessType::Fetch, address, link),
            Operation::EvictFromBackingStore => self
                .l1
                .back_invalidate(address, link)
                .map(StepOutcome::Evict),
            Operation::Reset => {
                self.l1.reset();
                Ok(StepOutcome::Reset)
            }
            Operation::ReportRequest => {
                self.report(sink);
                Ok(StepOutcome::Reported)
            }
        }
    }

    fn access(
        &mut self,
        access: AccessType,
        address: u32,
        link: &mut dyn BackingStoreLink,
    ) -> Result<StepOutcome, CacheError> {
        self.l1
            .access(access, address, link)
            .map(StepOutcome::Access)
    }

    /// Hands a report of the current cache state to `sink`.
    pub fn report(&self, sink: &mut dyn ReportSink) {
        sink.report(&self.l1.report());
    }

    /// Replays a whole trace.
    ///
    /// Inclusion violations are logged and the replay continues; any other
    /// engine error ends the replay.
    ///
    /// # Returns
    ///
    /// The [`RunSummary`], or the first I/O or fatal engine error.
    pub fn run<R: BufRead>(
        &mut self,
        reader: R,
        link: &mut dyn BackingStoreLink,
        sink: &mut dyn ReportSink,
    ) -> Result<RunSummary, SimError> {
        self.run_observed(reader, &mut Unobserved(link), sink)
    }

    /// Replays a whole trace, notifying `observer` after every event.
    ///
    /// # Arguments
    ///
    /// * `reader` - Trace text, one event per line
    /// * `observer` - Link for L1 → L2 messages and receiver of per-event outcomes
    /// * `sink` - Receiver of reports requested by the trace
    ///
    /// # Returns
    ///
    /// The [`RunSummary`], or the first I/O or fatal engine error.
    pub fn run_observed<R: BufRead, O: TraceObserver>(
        &mut self,
        reader: R,
        observer: &mut O,
        sink: &mut dyn ReportSink,
    ) -> Result<RunSummary, SimError> {
        let mut summary = RunSummary::default();
        for item in TraceReader::new(reader) {
            let (line, event) = item?;
            summary.events += 1;
            match self.step(event, observer, sink) {
                Ok(outcome) => observer.on_event(line, &event, &outcome),
                Err(CacheError::InclusionViolation { address }) => {
                    summary.inclusion_violations += 1;
                    warn!(line, "eviction of {address:#010x} ignored: line not found in L1");
                    observer.on_inclusion_violation(line, address);
                }
                Err(source) => return Err(SimError::Cache { line, source }),
            }
        }
        debug!(events = summary.events, "trace finished");
        Ok(summary)
    }
}
