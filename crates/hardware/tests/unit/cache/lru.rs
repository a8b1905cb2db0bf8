//! LRU Recency Stack Tests.
//!
//! Verifies the stack update rule (`touch`) and victim selection in
//! isolation. Rank `W-1` is the most recently used way and rank 0 the
//! victim. A property test compares the stack against a move-to-back list
//! model for arbitrary touch sequences.

use l1sim_core::cache::LruStack;
use l1sim_core::common::CacheError;
use proptest::prelude::*;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Initial State
// ══════════════════════════════════════════════════════════

/// A fresh stack is the identity permutation, so way 0 is the first victim.
#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
#[case(8)]
fn new_stack_is_identity(#[case] ways: usize) {
    let lru = LruStack::new(ways);
    let expected: Vec<u8> = (0..ways as u8).collect();
    assert_eq!(lru.ranks(), expected.as_slice());
    assert_eq!(lru.victim(0), Ok(0));
    assert!(lru.is_permutation());
}

// ══════════════════════════════════════════════════════════
// 2. Update Rule
// ══════════════════════════════════════════════════════════

/// Touching ways 0..3 in order leaves way 0 as LRU again.
#[test]
fn sequential_fill_makes_first_way_lru() {
    let mut lru = LruStack::new(4);
    for way in 0..4 {
        lru.touch(way);
    }
    assert_eq!(lru.ranks(), &[0, 1, 2, 3]);
    assert_eq!(lru.victim(0), Ok(0));
}

/// Re-touching the LRU way promotes it and exposes the next oldest.
#[test]
fn retouch_promotes_and_shifts_victim() {
    let mut lru = LruStack::new(4);
    for way in 0..4 {
        lru.touch(way);
    }

    lru.touch(0);
    assert_eq!(lru.ranks(), &[3, 0, 1, 2]);
    assert_eq!(lru.victim(0), Ok(1));

    lru.touch(1);
    assert_eq!(lru.ranks(), &[2, 3, 0, 1]);
    assert_eq!(lru.victim(0), Ok(2));
}

/// Touching a middle way only moves the ways ranked above it.
#[test]
fn touch_middle_way_keeps_lower_ranks() {
    let mut lru = LruStack::new(4);
    lru.touch(1);
    assert_eq!(lru.ranks(), &[0, 3, 1, 2]);
    assert_eq!(lru.rank(0), 0);
}

/// Reset restores the identity permutation after arbitrary use.
#[test]
fn reset_restores_identity() {
    let mut lru = LruStack::new(4);
    lru.touch(2);
    lru.touch(0);
    lru.reset();
    assert_eq!(lru.ranks(), &[0, 1, 2, 3]);
}

// ══════════════════════════════════════════════════════════
// 3. Corruption
// ══════════════════════════════════════════════════════════

/// A stack with no rank 0 cannot name a victim.
#[test]
fn missing_rank_zero_is_corrupted() {
    let mut lru = LruStack::new(4);
    lru.force_rank(0, 3);
    assert!(!lru.is_permutation());
    assert_eq!(
        lru.victim(17),
        Err(CacheError::CorruptedLru { set: 17, ways: 4 })
    );
}

/// Out-of-range ranks are not a permutation even if rank 0 exists.
#[test]
fn out_of_range_rank_is_not_permutation() {
    let mut lru = LruStack::new(2);
    lru.force_rank(1, 5);
    assert!(!lru.is_permutation());
    assert_eq!(lru.victim(0), Ok(0));
}

// ══════════════════════════════════════════════════════════
// 4. Model Check
// ══════════════════════════════════════════════════════════

fn touches() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1usize..=8).prop_flat_map(|ways| (Just(ways), prop::collection::vec(0..ways, 0..64)))
}

proptest! {
    /// After any touch sequence the ranks match a recency list in which a
    /// touched way moves to the back (MRU end).
    #[test]
    fn matches_recency_list_model((ways, seq) in touches()) {
        let mut lru = LruStack::new(ways);
        let mut order: Vec<usize> = (0..ways).collect();

        for way in seq {
            lru.touch(way);
            order.retain(|&w| w != way);
            order.push(way);

            prop_assert!(lru.is_permutation());
            prop_assert_eq!(usize::from(lru.rank(way)), ways - 1);
        }

        for (rank, &way) in order.iter().enumerate() {
            prop_assert_eq!(usize::from(lru.rank(way)), rank);
        }
        prop_assert_eq!(lru.victim(0), Ok(order[0]));
    }
}
