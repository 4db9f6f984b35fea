// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completes a bundle's execution: materializes dependencies, uploads the
//! artifact, commits the terminal state, and releases backend resources.

use crate::error::WorkerError;
use crate::install::install_dependencies;
use crate::scratch::ScratchRegistry;
use oj_blobstore::BlobStore;
use oj_core::{BundleId, BundleKind, BundleMetadata, BundleState, Clock};
use oj_machine::Machine;
use oj_storage::{BundleUpdate, MetadataStore};
use std::path::PathBuf;
use std::sync::Arc;

/// What a completed bundle needs finalized. Produced either by
/// `Finalizer::reap` (from `Machine::poll`) or directly by the Launcher for
/// `MakeBundle`s and launch errors, which never touch the backend.
pub struct FinalizeInput {
    pub bundle_uuid: BundleId,
    pub kind: BundleKind,
    pub success: bool,
    pub temp_dir: PathBuf,
    /// A failure already known before the install/upload step (e.g. a
    /// `LaunchError`), preserved even if that step itself succeeds.
    pub failure_message: Option<String>,
}

pub struct Finalizer<C: Clock> {
    store: Arc<dyn MetadataStore>,
    machine: Arc<dyn Machine>,
    blob_store: Arc<dyn BlobStore>,
    scratch: Arc<ScratchRegistry>,
    clock: C,
}

impl<C: Clock> Finalizer<C> {
    pub fn new(
        store: Arc<dyn MetadataStore>,
        machine: Arc<dyn Machine>,
        blob_store: Arc<dyn BlobStore>,
        scratch: Arc<ScratchRegistry>,
        clock: C,
    ) -> Self {
        Self { store, machine, blob_store, scratch, clock }
    }

    /// Polls the backend once and finalizes whatever it hands back.
    /// Returns `true` iff a bundle was finalized this call.
    pub async fn reap(&self) -> Result<bool, WorkerError> {
        let Some(outcome) = self.machine.poll().await else {
            return Ok(false);
        };
        self.finalize(FinalizeInput {
            bundle_uuid: outcome.bundle_uuid,
            kind: BundleKind::Run,
            success: outcome.success,
            temp_dir: outcome.temp_dir,
            failure_message: None,
        })
        .await?;
        Ok(true)
    }

    pub async fn finalize(&self, input: FinalizeInput) -> Result<(), WorkerError> {
        let record = self.scratch.consume(input.bundle_uuid)?;

        let mut success = input.success;
        let (data_hash, mut metadata) =
            match install_dependencies(self.blob_store.as_ref(), &record.dependencies, &record.parents, &input.temp_dir)
                .await
            {
                Ok(()) => match self.blob_store.upload(&input.temp_dir).await {
                    Ok((hash, upload_meta)) => {
                        let mut metadata = BundleMetadata { extra: upload_meta, ..BundleMetadata::default() };
                        if let Some(msg) = &input.failure_message {
                            metadata.failure_message = Some(msg.clone());
                        }
                        (Some(hash), metadata)
                    }
                    Err(err) => {
                        success = false;
                        (None, BundleMetadata::with_failure(err.to_string()))
                    }
                },
                Err(err) => {
                    success = false;
                    (None, BundleMetadata::with_failure(err.to_string()))
                }
            };

        if input.kind == BundleKind::Run {
            metadata.time = Some(self.clock.now().saturating_duration_since(record.start_time));
            if !record.applied_actions.is_empty() {
                metadata.actions = record.applied_actions.clone();
            }
        }

        let new_state = if success { BundleState::Ready } else { BundleState::Failed };
        self.store
            .update_bundle(
                input.bundle_uuid,
                BundleUpdate { state: Some(new_state), data_hash: Some(data_hash), metadata: Some(metadata) },
            )
            .await?;

        match input.kind {
            BundleKind::Run => self.machine.finalize(input.bundle_uuid).await,
            BundleKind::Make => {
                let _ = std::fs::remove_dir_all(&input.temp_dir);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "finalizer_tests.rs"]
mod tests;
