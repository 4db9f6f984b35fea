// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advances `STAGED` bundles to `RUNNING` and binds them to the backend.

use crate::error::WorkerError;
use crate::finalizer::{FinalizeInput, Finalizer};
use crate::scratch::ScratchRegistry;
use oj_blobstore::BlobStore;
use oj_core::{Bundle, BundleId, BundleKind, BundleState, Clock};
use oj_machine::Machine;
use oj_storage::{BundleFilter, BundleUpdate, MetadataStore};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Launcher<C: Clock> {
    store: Arc<dyn MetadataStore>,
    machine: Arc<dyn Machine>,
    blob_store: Arc<dyn BlobStore>,
    scratch: Arc<ScratchRegistry>,
    clock: C,
}

impl<C: Clock> Launcher<C> {
    pub fn new(
        store: Arc<dyn MetadataStore>,
        machine: Arc<dyn Machine>,
        blob_store: Arc<dyn BlobStore>,
        scratch: Arc<ScratchRegistry>,
        clock: C,
    ) -> Self {
        Self { store, machine, blob_store, scratch, clock }
    }

    /// Fetches every `STAGED` bundle and independently attempts to launch
    /// each. Returns `true` iff the backend actually accepted at least one
    /// `RunBundle` (used by the control loop's activity signal; `MakeBundle`s
    /// and rollbacks don't count as backend activity).
    pub async fn advance(&self) -> Result<bool, WorkerError> {
        let staged = self.store.batch_get_bundles(BundleFilter::by_state(BundleState::Staged)).await?;
        if staged.is_empty() {
            return Ok(false);
        }

        let mut started_any = false;
        for bundle in staged {
            let claimed = self
                .store
                .batch_update_bundles(&[bundle.uuid], BundleUpdate::to_state(BundleState::Running), BundleState::Staged)
                .await?;
            if !claimed {
                tracing::debug!(bundle_uuid = %bundle.uuid, "peer claimed staged bundle first");
                continue;
            }

            let mut bundle = bundle;
            bundle.state = BundleState::Running;
            if self.start(bundle).await? {
                started_any = true;
            }
        }

        Ok(started_any)
    }

    /// Launches a single `RUNNING` bundle. Precondition: `bundle.state ==
    /// Running` and `bundle.data_hash.is_none()`; violating it is a
    /// programmer error, not a runtime condition worth an `Err`.
    ///
    /// Returns whether the backend actually accepted a `RunBundle` launch.
    async fn start(&self, bundle: Bundle) -> Result<bool, WorkerError> {
        assert_eq!(bundle.state, BundleState::Running, "Launcher::start called on a non-RUNNING bundle");
        assert!(bundle.data_hash.is_none(), "Launcher::start called on a bundle that already has a data_hash");

        let parent_uuids: Vec<BundleId> = bundle.parent_uuids().collect();
        let parents: HashMap<BundleId, Bundle> = if parent_uuids.is_empty() {
            HashMap::new()
        } else {
            self.store
                .batch_get_bundles(BundleFilter::by_uuids(parent_uuids))
                .await?
                .into_iter()
                .map(|b| (b.uuid, b))
                .collect()
        };

        self.scratch.begin(bundle.uuid, self.clock.now(), bundle.dependencies.clone(), parents.clone());

        match bundle.kind {
            BundleKind::Make => {
                self.finalize_inline(bundle.uuid, BundleKind::Make, true, None).await?;
                Ok(false)
            }
            BundleKind::Run => match self.machine.start(&bundle, self.blob_store.as_ref(), &parents).await {
                Ok(_started) => Ok(true),
                Err(err) => match err {
                    oj_machine::LaunchError::Rejected(reason) => {
                        tracing::debug!(bundle_uuid = %bundle.uuid, reason, "launch rejected, rolling back to staged");
                        self.scratch.consume(bundle.uuid)?;
                        let rolled_back = self
                            .store
                            .batch_update_bundles(
                                &[bundle.uuid],
                                BundleUpdate::to_state(BundleState::Staged),
                                BundleState::Running,
                            )
                            .await?;
                        if !rolled_back {
                            return Err(WorkerError::Invariant(format!(
                                "failed to roll back rejected launch for bundle {}: it was no longer RUNNING",
                                bundle.uuid
                            )));
                        }
                        Ok(false)
                    }
                    oj_machine::LaunchError::Failed(message) => {
                        self.finalize_inline(bundle.uuid, BundleKind::Run, false, Some(message)).await?;
                        Ok(true)
                    }
                },
            },
        }
    }

    /// Finalizes a bundle that never touches `Machine::poll`'s trajectory:
    /// a `MakeBundle`, or a `RunBundle` whose launch failed outright. Both
    /// get a fresh temp directory rather than one the backend produced.
    async fn finalize_inline(
        &self,
        bundle_uuid: BundleId,
        kind: BundleKind,
        success: bool,
        failure_message: Option<String>,
    ) -> Result<(), WorkerError> {
        let temp_dir = fresh_temp_dir(bundle_uuid);
        std::fs::create_dir_all(&temp_dir).map_err(|err| WorkerError::Invariant(err.to_string()))?;

        let finalizer = Finalizer::new(
            self.store.clone(),
            self.machine.clone(),
            self.blob_store.clone(),
            self.scratch.clone(),
            self.clock.clone(),
        );
        finalizer.finalize(FinalizeInput { bundle_uuid, kind, success, temp_dir, failure_message }).await
    }
}

fn fresh_temp_dir(bundle_uuid: BundleId) -> PathBuf {
    std::env::temp_dir().join(format!("oj-bundle-{bundle_uuid}"))
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
