// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use oj_blobstore::fake::FakeBlobStore;
use oj_core::{Bundle, BundleKind, BundleState, FakeClock};
use oj_machine::fake::FakeMachine;
use oj_machine::LaunchError;
use oj_storage::{BundleFilter, InMemoryMetadataStore};

fn launcher(
    store: &InMemoryMetadataStore,
    machine: &FakeMachine,
    blob_store: &FakeBlobStore,
    scratch: &Arc<ScratchRegistry>,
    clock: &FakeClock,
) -> Launcher<FakeClock> {
    Launcher::new(Arc::new(store.clone()), Arc::new(machine.clone()), Arc::new(blob_store.clone()), scratch.clone(), clock.clone())
}

#[tokio::test]
async fn run_bundle_launch_success_stays_running() {
    let store = InMemoryMetadataStore::new();
    let machine = FakeMachine::new();
    let blob_store = FakeBlobStore::new();
    let scratch = Arc::new(ScratchRegistry::new());
    let clock = FakeClock::new();

    let bundle = Bundle::builder().state(BundleState::Staged).build();
    store.insert_bundle(bundle.clone()).await.unwrap();

    let started = launcher(&store, &machine, &blob_store, &scratch, &clock).advance().await.unwrap();
    assert!(started);

    let rows = store.batch_get_bundles(BundleFilter::by_uuids([bundle.uuid])).await.unwrap();
    assert_eq!(rows[0].state, BundleState::Running);
    assert_eq!(scratch.len(), 1);
}

#[tokio::test]
async fn make_bundle_finalizes_immediately_without_backend_call() {
    let store = InMemoryMetadataStore::new();
    let machine = FakeMachine::new();
    let blob_store = FakeBlobStore::new();
    let scratch = Arc::new(ScratchRegistry::new());
    let clock = FakeClock::new();

    let bundle = Bundle::builder().kind(BundleKind::Make).state(BundleState::Staged).build();
    store.insert_bundle(bundle.clone()).await.unwrap();

    let started = launcher(&store, &machine, &blob_store, &scratch, &clock).advance().await.unwrap();
    assert!(!started, "MakeBundle finalize doesn't count as backend activity");

    let rows = store.batch_get_bundles(BundleFilter::by_uuids([bundle.uuid])).await.unwrap();
    assert_eq!(rows[0].state, BundleState::Ready);
    assert!(rows[0].data_hash.is_some());
    assert_eq!(scratch.len(), 0, "scratch record consumed on inline finalize");
}

#[tokio::test]
async fn launch_rejection_rolls_back_to_staged() {
    let store = InMemoryMetadataStore::new();
    let machine = FakeMachine::new();
    let blob_store = FakeBlobStore::new();
    let scratch = Arc::new(ScratchRegistry::new());
    let clock = FakeClock::new();

    let bundle = Bundle::builder().state(BundleState::Staged).build();
    store.insert_bundle(bundle.clone()).await.unwrap();
    machine.script_start(bundle.uuid, Err(LaunchError::Rejected("no capacity".into())));

    let started = launcher(&store, &machine, &blob_store, &scratch, &clock).advance().await.unwrap();
    assert!(!started);

    let rows = store.batch_get_bundles(BundleFilter::by_uuids([bundle.uuid])).await.unwrap();
    assert_eq!(rows[0].state, BundleState::Staged);
    assert_eq!(scratch.len(), 0, "scratch record released on rollback");
}

#[tokio::test]
async fn launch_failure_finalizes_as_failed_without_running_residue() {
    let store = InMemoryMetadataStore::new();
    let machine = FakeMachine::new();
    let blob_store = FakeBlobStore::new();
    let scratch = Arc::new(ScratchRegistry::new());
    let clock = FakeClock::new();

    let bundle = Bundle::builder().state(BundleState::Staged).build();
    store.insert_bundle(bundle.clone()).await.unwrap();
    machine.script_start(bundle.uuid, Err(LaunchError::Failed("backend exploded".into())));

    let started = launcher(&store, &machine, &blob_store, &scratch, &clock).advance().await.unwrap();
    assert!(started, "a launch failure still 'moves' the bundle, per the finalize-inline contract");

    let rows = store.batch_get_bundles(BundleFilter::by_uuids([bundle.uuid])).await.unwrap();
    assert_eq!(rows[0].state, BundleState::Failed);
    assert_eq!(rows[0].metadata.failure_message.as_deref(), Some("backend exploded"));
    assert_eq!(scratch.len(), 0);
}

#[tokio::test]
async fn no_staged_bundles_is_not_activity() {
    let store = InMemoryMetadataStore::new();
    let machine = FakeMachine::new();
    let blob_store = FakeBlobStore::new();
    let scratch = Arc::new(ScratchRegistry::new());
    let clock = FakeClock::new();

    let started = launcher(&store, &machine, &blob_store, &scratch, &clock).advance().await.unwrap();
    assert!(!started);
}

#[tokio::test]
async fn a_bundle_a_peer_already_moved_out_of_staged_is_left_alone() {
    let store = InMemoryMetadataStore::new();
    let machine = FakeMachine::new();
    let blob_store = FakeBlobStore::new();
    let scratch = Arc::new(ScratchRegistry::new());
    let clock = FakeClock::new();

    // Simulate a peer having already won the STAGED -> RUNNING race before
    // this tick's batch_get_bundles ran: by the time advance() looks, the
    // bundle no longer shows up as Staged at all, so it's untouched here.
    let claimed = Bundle::builder().state(BundleState::Running).build();
    store.insert_bundle(claimed.clone()).await.unwrap();

    let genuinely_staged = Bundle::builder().state(BundleState::Staged).build();
    store.insert_bundle(genuinely_staged.clone()).await.unwrap();

    let started = launcher(&store, &machine, &blob_store, &scratch, &clock).advance().await.unwrap();
    assert!(started);
    assert_eq!(scratch.len(), 1, "only the genuinely staged bundle got a scratch record");

    let rows = store.batch_get_bundles(BundleFilter::by_uuids([claimed.uuid])).await.unwrap();
    assert_eq!(rows[0].state, BundleState::Running, "peer's claim is untouched");
}
