//! Cache content and statistics reports.
//!
//! A [`Report`] is a read-only projection of the hierarchy: per-cache
//! statistics, hit ratio and every valid line with its recency rank.
//! Reports are handed to a [`ReportSink`] when the trace asks for one.

use serde::Serialize;

use crate::cache::{Cache, Mesi};
use crate::common::CacheKind;
use crate::config::CoherenceModel;
use crate::stats::CacheStats;

/// One valid line as seen by a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LineSnapshot {
    /// Set index.
    pub set: usize,
    /// Way within the set.
    pub way: usize,
    /// Block tag.
    pub tag: u16,
    /// Address of the last access to the line.
    pub address: u32,
    /// Written since fill.
    pub dirty: bool,
    /// Recency rank (`ways - 1` is most recently used).
    pub rank: u8,
    /// MESI state of the line.
    pub state: Mesi,
}

/// Snapshot of one cache.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CacheReport {
    /// Which cache.
    pub kind: CacheKind,
    /// Associativity.
    pub ways: usize,
    /// Counters at the time of the report.
    pub stats: CacheStats,
    /// `hits / (hits + misses)`, `None` before the first access.
    pub hit_ratio: Option<f64>,
    /// Valid lines in (set, way) order.
    pub lines: Vec<LineSnapshot>,
}

/// Snapshot of the whole L1.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    /// Line state naming in use.
    pub coherence: CoherenceModel,
    /// Data cache.
    pub data: CacheReport,
    /// Instruction cache.
    pub instruction: CacheReport,
}

/// Receiver of reports requested by the trace.
pub trait ReportSink {
    /// Called once per report request.
    fn report(&mut self, report: &Report);
}

/// Sink that keeps every report it receives.
#[derive(Debug, Default)]
pub struct CollectedReports {
    /// Reports in request order.
    pub reports: Vec<Report>,
}

impl ReportSink for CollectedReports {
    fn report(&mut self, report: &Report) {
        self.reports.push(report.clone());
    }
}

impl Cache {
    /// Builds the report for this cache. Does not mutate anything.
    pub fn report(&self) -> CacheReport {
        let kind = self.kind();
        let lines = self
            .sets()
            .iter()
            .enumerate()
            .flat_map(|(set_index, set)| {
                set.lines()
                    .iter()
                    .enumerate()
                    .filter(|(_, line)| line.valid)
                    .map(move |(way, line)| LineSnapshot {
                        set: set_index,
                        way,
                        tag: line.tag,
                        address: line.address,
                        dirty: line.dirty,
                        rank: set.lru().rank(way),
                        state: line.mesi(kind),
                    })
            })
            .collect();

        CacheReport {
            kind,
            ways: self.ways(),
            stats: *self.stats(),
            hit_ratio: self.stats().hit_ratio(),
            lines,
        }
    }
}
