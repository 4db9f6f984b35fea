// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oj-storage: the durable metadata store contract the worker reconciles
//! bundle state against, plus an in-memory reference implementation.

pub mod error;
pub mod memory;
pub mod types;

pub use error::StoreError;
pub use memory::InMemoryMetadataStore;
pub use types::{BundleFilter, BundleUpdate};

use async_trait::async_trait;
use oj_core::{Bundle, BundleAction, BundleId};

/// The durable store of bundle rows and the queued action inbox.
///
/// Every mutation the worker core performs against shared state goes through
/// this trait. `batch_update_bundles` is the *only* place concurrency safety
/// is enforced: it must apply `update` to every selected row atomically and
/// only if each row's current state still equals `condition`, otherwise it
/// must apply to none of them and return `false`.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Fetch bundles matching `filter`. An empty filter matches nothing.
    async fn batch_get_bundles(&self, filter: BundleFilter) -> Result<Vec<Bundle>, StoreError>;

    /// Apply `update` to every bundle in `uuids`, iff each one's current
    /// state equals `condition`. All-or-nothing: if any row fails the
    /// condition, no row is updated and this returns `Ok(false)`.
    async fn batch_update_bundles(
        &self,
        uuids: &[BundleId],
        update: BundleUpdate,
        condition: oj_core::BundleState,
    ) -> Result<bool, StoreError>;

    /// Unconditional single-row update. Used only where the worker already
    /// owns exclusive rights to the row (it holds the only `RUNNING` claim).
    async fn update_bundle(&self, uuid: BundleId, update: BundleUpdate) -> Result<(), StoreError>;

    /// Atomically drain the entire action queue.
    async fn pop_bundle_actions(&self) -> Result<Vec<BundleAction>, StoreError>;

    /// Enqueue actions (used both by operators and by a worker re-queuing an
    /// action it couldn't act on).
    async fn add_bundle_actions(&self, actions: Vec<BundleAction>) -> Result<(), StoreError>;

    /// Seed a new bundle into the store. Not part of the worker's external
    /// read/update contract (bundle creation is the REST surface's job) but
    /// every implementation needs *some* way to get a row in, so it is part
    /// of this trait rather than bolted onto each concrete type separately.
    async fn insert_bundle(&self, bundle: Bundle) -> Result<(), StoreError>;
}
