// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests for the invariants enumerated in the worker's design
//! notes: legal state transitions, dependency-resolution preconditions,
//! and the dispatcher's action-count conservation.

use oj_core::{Bundle, BundleId, BundleState};
use oj_storage::{BundleFilter, InMemoryMetadataStore, MetadataStore};
use oj_worker::DependencyResolver;
use proptest::prelude::*;
use std::sync::Arc;

fn arb_parent_state() -> impl Strategy<Value = BundleState> {
    prop_oneof![
        Just(BundleState::Created),
        Just(BundleState::Staged),
        Just(BundleState::Running),
        Just(BundleState::Ready),
        Just(BundleState::Failed),
    ]
}

/// A child with 1-4 parents, each seeded at an independently chosen state.
fn arb_family() -> impl Strategy<Value = Vec<BundleState>> {
    prop::collection::vec(arb_parent_state(), 1..4)
}

fn run_resolver_once(parent_states: &[BundleState]) -> (BundleState, Vec<BundleId>, Bundle) {
    tokio::runtime::Runtime::new().unwrap().block_on(async {
        let store = InMemoryMetadataStore::new();

        let mut parent_uuids = Vec::new();
        for state in parent_states {
            let parent = Bundle::builder().state(*state).build();
            parent_uuids.push(parent.uuid);
            store.insert_bundle(parent).await.unwrap();
        }

        let mut child = Bundle::builder().build();
        for uuid in &parent_uuids {
            child.dependencies.push(oj_core::Dependency::new(*uuid, "", ""));
        }
        store.insert_bundle(child.clone()).await.unwrap();

        DependencyResolver::new(Arc::new(store.clone())).advance().await.unwrap();

        let row = store.batch_get_bundles(BundleFilter::by_uuids([child.uuid])).await.unwrap().remove(0);
        (row.state, parent_uuids, row)
    })
}

proptest! {
    /// Invariant 1: every `(pre, post)` pair the resolver produces for a
    /// `CREATED` bundle is one of the legal DAG edges from `SPEC_FULL.md`
    /// §3 (`CREATED -> STAGED` or `CREATED -> FAILED`); it never jumps
    /// straight to `RUNNING` or `READY`, and it never regresses.
    #[test]
    fn resolver_only_produces_legal_transitions(parent_states in arb_family()) {
        let (post, _, _) = run_resolver_once(&parent_states);
        prop_assert!(
            post == BundleState::Created
                || BundleState::Created.can_transition_to(post),
            "CREATED -> {post:?} is not a legal edge"
        );
    }

    /// Invariant 2: reaching `STAGED` implies every parent was `READY` at
    /// the moment of transition.
    #[test]
    fn staging_implies_all_parents_were_ready(parent_states in arb_family()) {
        let (post, _, _) = run_resolver_once(&parent_states);
        if post == BundleState::Staged {
            prop_assert!(parent_states.iter().all(|s| *s == BundleState::Ready));
        }
    }

    /// Invariant 3: reaching `FAILED` from `CREATED` implies at least one
    /// parent was `FAILED`, and the failure message names it.
    #[test]
    fn failing_implies_a_failed_parent_is_named(parent_states in arb_family()) {
        let (post, parent_uuids, row) = run_resolver_once(&parent_states);
        if post == BundleState::Failed {
            let failed: Vec<BundleId> = parent_states
                .iter()
                .zip(parent_uuids.iter())
                .filter(|(s, _)| **s == BundleState::Failed)
                .map(|(_, uuid)| *uuid)
                .collect();
            prop_assert!(!failed.is_empty());
            let message = row.metadata.failure_message.expect("FAILED bundle must carry a failure_message");
            for uuid in failed {
                prop_assert!(message.contains(&uuid.to_string()));
            }
        }
    }

    /// A bundle with at least one non-ready, non-failed parent (and no
    /// failed parent) is left in `CREATED` rather than staged or failed
    /// outright — resolution only fires once the picture is unambiguous.
    #[test]
    fn ambiguous_family_is_left_pending(parent_states in arb_family()) {
        let has_failed = parent_states.iter().any(|s| *s == BundleState::Failed);
        let all_ready = parent_states.iter().all(|s| *s == BundleState::Ready);
        let (post, _, _) = run_resolver_once(&parent_states);
        if !has_failed && !all_ready {
            prop_assert_eq!(post, BundleState::Created);
        }
    }
}

mod dispatcher_conservation {
    use super::*;
    use oj_core::BundleAction;
    use oj_machine::fake::FakeMachine;
    use oj_worker::{ActionDispatcher, ScratchRegistry};

    fn arb_outcomes() -> impl Strategy<Value = Vec<bool>> {
        prop::collection::vec(any::<bool>(), 0..12)
    }

    /// Drains a queue of `KILL` actions, one per scripted `accepted` outcome,
    /// and returns `(consumed, re-queued)` counts.
    fn run_dispatcher_once(outcomes: &[bool]) -> (usize, usize) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let store = InMemoryMetadataStore::new();
            let machine = FakeMachine::new();
            let scratch = Arc::new(ScratchRegistry::new());

            for accepted in outcomes {
                let uuid = BundleId::new();
                machine.script_kill(uuid, *accepted);
                store.add_bundle_actions(vec![BundleAction::kill(uuid)]).await.unwrap();
            }

            let dispatcher = ActionDispatcher::new(Arc::new(store.clone()), Arc::new(machine.clone()), scratch.clone());
            dispatcher.drain().await.unwrap();

            let consumed = scratch.len();
            let requeued = store.pop_bundle_actions().await.unwrap().len();
            (consumed, requeued)
        })
    }

    proptest! {
        /// Invariant 7: `consumed + re-queued == popped`. Whatever the
        /// backend decides for each popped `KILL`, the dispatcher accounts
        /// for every action it drained: each either lands in a
        /// `ScratchRecord` (consumed) or goes back on the queue
        /// (re-queued), and the store never loses or duplicates one.
        #[test]
        fn every_popped_action_is_consumed_or_requeued(outcomes in arb_outcomes()) {
            let (consumed, requeued) = run_dispatcher_once(&outcomes);
            prop_assert_eq!(consumed + requeued, outcomes.len());

            let expected_consumed = outcomes.iter().filter(|a| **a).count();
            prop_assert_eq!(consumed, expected_consumed);
        }
    }
}
