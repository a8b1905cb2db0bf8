//! # Report Tests
//!
//! Reports are read-only snapshots: statistics, hit ratio and each valid
//! line with its recency rank and MESI state.

use l1sim_core::cache::Mesi;
use l1sim_core::common::CacheKind;
use l1sim_core::config::{CoherenceModel, Config};
use l1sim_core::report::LineSnapshot;
use pretty_assertions::assert_eq;

use crate::common::{TestContext, addr};

#[test]
fn empty_report() {
    let ctx = TestContext::new();
    let report = ctx.l1.report();

    assert_eq!(report.coherence, CoherenceModel::DirtyBit);
    assert_eq!(report.data.kind, CacheKind::Data);
    assert_eq!(report.data.ways, 4);
    assert_eq!(report.instruction.ways, 2);
    assert!(report.data.lines.is_empty());
    assert_eq!(report.data.hit_ratio, None);
}

#[test]
fn report_lists_valid_lines_with_ranks() {
    let mut ctx = TestContext::new();
    let _ = ctx.write(0x0000_0000);
    let _ = ctx.read(0x0010_0004);
    let _ = ctx.fetch(addr(1, 5, 0));

    let report = ctx.l1.report();
    assert_eq!(
        report.data.lines,
        vec![
            LineSnapshot {
                set: 0,
                way: 0,
                tag: 0,
                address: 0x0000_0000,
                dirty: true,
                rank: 2,
                state: Mesi::Modified,
            },
            LineSnapshot {
                set: 0,
                way: 1,
                tag: 1,
                address: 0x0010_0004,
                dirty: false,
                rank: 3,
                state: Mesi::Exclusive,
            },
        ]
    );
    assert_eq!(
        report.instruction.lines,
        vec![LineSnapshot {
            set: 5,
            way: 0,
            tag: 1,
            address: addr(1, 5, 0),
            dirty: false,
            rank: 1,
            state: Mesi::Shared,
        }]
    );
    assert_eq!(report.data.hit_ratio, Some(0.0));
}

/// Back-invalidated lines drop out of the report.
#[test]
fn invalid_lines_omitted() {
    let mut ctx = TestContext::new();
    let _ = ctx.read(0x0000_0000);
    let _ = ctx.evict(0x0000_0000).unwrap();
    assert!(ctx.l1.report().data.lines.is_empty());
}

/// Building a report does not disturb recency or statistics.
#[test]
fn report_is_read_only() {
    let mut ctx = TestContext::new();
    let _ = ctx.read(0x0000_0000);
    let first = ctx.l1.report();
    let second = ctx.l1.report();
    assert_eq!(first, second);
}

#[test]
fn coherence_model_carried_into_report() {
    let config = Config {
        coherence: CoherenceModel::Mesi,
        ..Config::default()
    };
    let ctx = TestContext::with_config(&config);
    assert_eq!(ctx.l1.report().coherence, CoherenceModel::Mesi);
}

#[test]
fn report_serializes_to_json() {
    let mut ctx = TestContext::new();
    let _ = ctx.write(0x0000_0000);
    let json = serde_json::to_value(ctx.l1.report()).unwrap();

    assert_eq!(json["data"]["stats"]["writes"], 1);
    assert_eq!(json["data"]["lines"][0]["state"], "Modified");
    assert_eq!(json["instruction"]["hit_ratio"], serde_json::Value::Null);
}
