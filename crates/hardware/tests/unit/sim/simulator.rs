//! Simulator Tests.
//!
//! Drives whole traces through `Simulator::step`, `Simulator::run` and
//! `Simulator::run_observed`, from in-memory buffers and from trace files
//! on disk.

use std::fs::File;
use std::io::{BufReader, Cursor, Write};

use l1sim_core::cache::Resolution;
use l1sim_core::common::{CacheError, CacheKind, SimError};
use l1sim_core::config::{Config, InclusionPolicy};
use l1sim_core::hierarchy::EvictOutcome;
use l1sim_core::link::{BackingStoreLink, BusMessage, FetchIntent, MessageLog, NullLink};
use l1sim_core::report::CollectedReports;
use l1sim_core::sim::{
    Operation, RunSummary, Simulator, StepOutcome, TraceEvent, TraceObserver,
};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

/// Fills set 0 of the data cache, dirties way 0, forces a replacement and
/// asks for a report.
const REPLACEMENT_TRACE: &str = "\
# four tags in set 0
1 00000000
0 00100000
0 00200000
0 00300000
0 00400000
9
";

/// Records, for every event, the messages that preceded it on the link.
#[derive(Default)]
struct Recorder {
    log: MessageLog,
    events: Vec<(usize, StepOutcome, Vec<BusMessage>)>,
    violations: Vec<(usize, u32)>,
}

impl BackingStoreLink for Recorder {
    fn fetch(&mut self, address: u32, intent: FetchIntent) {
        self.log.fetch(address, intent);
    }

    fn writeback(&mut self, address: u32) {
        self.log.writeback(address);
    }

    fn invalidate_ack(&mut self, address: u32) {
        self.log.invalidate_ack(address);
    }
}

impl TraceObserver for Recorder {
    fn on_event(&mut self, line: usize, _event: &TraceEvent, outcome: &StepOutcome) {
        let messages = self.log.take();
        self.events.push((line, *outcome, messages));
    }

    fn on_inclusion_violation(&mut self, line: usize, address: u32) {
        self.violations.push((line, address));
    }
}

#[test]
fn step_dispatches_each_operation() {
    let mut sim = Simulator::new(&Config::default());
    let mut link = MessageLog::new();
    let mut sink = CollectedReports::default();

    let out = sim
        .step(TraceEvent::new(Operation::Fetch, 0x40), &mut link, &mut sink)
        .unwrap();
    assert!(matches!(out, StepOutcome::Access(a) if a.cache == CacheKind::Instruction));

    let out = sim
        .step(TraceEvent::new(Operation::EvictFromBackingStore, 0x9999_0000), &mut link, &mut sink)
        .unwrap();
    assert_eq!(out, StepOutcome::Evict(EvictOutcome::Absent));

    let out = sim
        .step(TraceEvent::new(Operation::ReportRequest, 0), &mut link, &mut sink)
        .unwrap();
    assert_eq!(out, StepOutcome::Reported);
    assert_eq!(sink.reports.len(), 1);
    assert_eq!(sink.reports[0].instruction.lines.len(), 1);

    let out = sim
        .step(TraceEvent::new(Operation::Reset, 0), &mut link, &mut sink)
        .unwrap();
    assert_eq!(out, StepOutcome::Reset);
    assert_eq!(sim.l1().instruction().stats().accesses(), 0);
}

#[test]
fn run_replacement_trace() {
    let mut sim = Simulator::new(&Config::default());
    let mut link = MessageLog::new();
    let mut sink = CollectedReports::default();

    let summary = sim
        .run(Cursor::new(REPLACEMENT_TRACE), &mut link, &mut sink)
        .unwrap();
    assert_eq!(
        summary,
        RunSummary {
            events: 6,
            inclusion_violations: 0
        }
    );

    assert_eq!(link.fetches(), 5);
    assert_eq!(link.writebacks(), 1);
    assert_eq!(
        &link.messages()[4..],
        &[
            BusMessage::Writeback {
                address: 0x0000_0000
            },
            BusMessage::Fetch {
                address: 0x0040_0000,
                intent: FetchIntent::Read
            },
        ]
    );

    let report = &sink.reports[0];
    assert_eq!(report.data.stats.misses, 5);
    assert_eq!(report.data.stats.writebacks, 1);
    let tags: Vec<u16> = report.data.lines.iter().map(|l| l.tag).collect();
    assert_eq!(tags, vec![4, 1, 2, 3]);
}

/// Inclusion violations are counted and the replay carries on.
#[test]
fn run_counts_inclusion_violations() {
    let config = Config {
        inclusion: InclusionPolicy::Strict,
        ..Config::default()
    };
    let mut sim = Simulator::new(&config);
    let mut sink = CollectedReports::default();

    let summary = sim
        .run(Cursor::new("3 00500000\n0 00500000\n3 00600000\n"), &mut NullLink, &mut sink)
        .unwrap();
    assert_eq!(summary.events, 3);
    assert_eq!(summary.inclusion_violations, 2);
    assert_eq!(sim.l1().data().stats().misses, 1);
}

/// Engine errors other than inclusion violations stop the replay and carry
/// the trace line number.
#[test]
fn run_stops_on_corrupted_lru() {
    let mut sim = Simulator::new(&Config::default());
    let mut sink = CollectedReports::default();
    for tag in 0..4u32 {
        let _ = sim
            .step(TraceEvent::new(Operation::Read, tag << 20), &mut NullLink, &mut sink)
            .unwrap();
    }
    sim.l1_mut().cache_mut(CacheKind::Data).lru_mut(0).force_rank(0, 3);

    let err = sim
        .run(Cursor::new("# corrupt\n0 00400000\n9\n"), &mut NullLink, &mut sink)
        .unwrap_err();
    assert!(matches!(
        err,
        SimError::Cache {
            line: 2,
            source: CacheError::CorruptedLru { set: 0, ways: 4 }
        }
    ));
    assert!(sink.reports.is_empty());
}

#[test]
fn run_from_trace_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(REPLACEMENT_TRACE.as_bytes()).unwrap();
    file.write_all(b"3 00400000\n8\n2 00000100\n9\n").unwrap();

    let mut sim = Simulator::new(&Config::default());
    let mut link = MessageLog::new();
    let mut sink = CollectedReports::default();
    let reader = BufReader::new(File::open(file.path()).unwrap());

    let summary = sim.run(reader, &mut link, &mut sink).unwrap();
    assert_eq!(summary.events, 10);
    assert_eq!(sink.reports.len(), 2);

    let after_reset = &sink.reports[1];
    assert!(after_reset.data.lines.is_empty());
    assert_eq!(after_reset.data.stats.accesses(), 0);
    assert_eq!(after_reset.instruction.stats.misses, 1);
}

/// Back-invalidation from the trace followed by an access refills in place.
#[test]
fn trace_evict_then_refill() {
    let mut sim = Simulator::new(&Config::default());
    let mut link = MessageLog::new();
    let mut sink = CollectedReports::default();
    let _ = sim
        .run(Cursor::new("1 00000040\n3 00000040\n"), &mut link, &mut sink)
        .unwrap();

    let out = sim
        .step(TraceEvent::new(Operation::Read, 0x40), &mut link, &mut sink)
        .unwrap();
    match out {
        StepOutcome::Access(access) => {
            assert_eq!(access.set, 1);
            assert_eq!(access.resolution, Resolution::Refill);
        }
        other => panic!("expected an access, got {other:?}"),
    }
}

/// The observer sees each event after its messages, with its trace line.
#[test]
fn run_observed_reports_each_event() {
    let mut sim = Simulator::new(&Config::default());
    let mut recorder = Recorder::default();
    let mut sink = CollectedReports::default();

    let summary = sim
        .run_observed(Cursor::new(REPLACEMENT_TRACE), &mut recorder, &mut sink)
        .unwrap();
    assert_eq!(summary.events, 6);
    assert_eq!(recorder.events.len(), 6);

    let (line, outcome, messages) = &recorder.events[4];
    assert_eq!(*line, 6);
    assert!(matches!(
        outcome,
        StepOutcome::Access(a)
            if a.resolution == (Resolution::Replace { victim: 0, written_back: true })
    ));
    assert_eq!(
        messages,
        &vec![
            BusMessage::Writeback { address: 0 },
            BusMessage::Fetch {
                address: 0x0040_0000,
                intent: FetchIntent::Read
            },
        ]
    );
    assert_eq!(recorder.events[5].1, StepOutcome::Reported);
}

#[test]
fn run_observed_reports_inclusion_violations() {
    let config = Config {
        inclusion: InclusionPolicy::Strict,
        ..Config::default()
    };
    let mut sim = Simulator::new(&config);
    let mut recorder = Recorder::default();
    let mut sink = CollectedReports::default();

    let summary = sim
        .run_observed(Cursor::new("0 40\n3 00700000\n"), &mut recorder, &mut sink)
        .unwrap();
    assert_eq!(summary.inclusion_violations, 1);
    assert_eq!(recorder.violations, vec![(2, 0x0070_0000)]);
    assert_eq!(recorder.events.len(), 1);
}

/// A report can be taken after the replay, reflecting the final state.
#[test]
fn report_after_run() {
    let mut sim = Simulator::new(&Config::default());
    let mut sink = CollectedReports::default();
    let _ = sim
        .run(Cursor::new("1 00000000\n2 00000100\n"), &mut NullLink, &mut sink)
        .unwrap();
    assert!(sink.reports.is_empty());

    sim.report(&mut sink);
    assert_eq!(sink.reports.len(), 1);
    assert_eq!(sink.reports[0].data.stats.writes, 1);
    assert_eq!(sink.reports[0].instruction.lines.len(), 1);
}
