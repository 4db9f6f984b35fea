// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

#[test]
fn begin_then_consume_round_trips() {
    let registry = ScratchRegistry::new();
    let uuid = BundleId::new();
    let start = Instant::now();

    registry.begin(uuid, start, Vec::new(), HashMap::new());
    assert_eq!(registry.len(), 1);

    let record = registry.consume(uuid).unwrap();
    assert_eq!(record.start_time, start);
    assert!(record.applied_actions.is_empty());
    assert_eq!(registry.len(), 0);
}

#[test]
fn consume_without_begin_is_invariant_violation() {
    let registry = ScratchRegistry::new();
    let err = registry.consume(BundleId::new()).unwrap_err();
    assert!(matches!(err, WorkerError::Invariant(_)));
}

#[test]
fn record_action_appends_to_live_record() {
    let registry = ScratchRegistry::new();
    let uuid = BundleId::new();
    registry.begin(uuid, Instant::now(), Vec::new(), HashMap::new());

    registry.record_action(uuid, BundleActionKind::Kill);
    let record = registry.consume(uuid).unwrap();
    assert_eq!(record.applied_actions, vec![BundleActionKind::Kill]);
}

#[test]
fn record_action_on_unknown_bundle_is_a_noop() {
    let registry = ScratchRegistry::new();
    registry.record_action(BundleId::new(), BundleActionKind::Kill);
}

#[test]
#[should_panic(expected = "live record")]
fn begin_twice_for_the_same_bundle_panics() {
    let registry = ScratchRegistry::new();
    let uuid = BundleId::new();
    registry.begin(uuid, Instant::now(), Vec::new(), HashMap::new());
    registry.begin(uuid, Instant::now(), Vec::new(), HashMap::new());
}
