// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drains operator-issued actions (currently just `KILL`) from the store's
//! action queue and applies them against whichever bundles this worker's
//! `Machine` actually has in flight.

use crate::error::WorkerError;
use crate::scratch::ScratchRegistry;
use oj_core::BundleActionKind;
use oj_machine::Machine;
use oj_storage::MetadataStore;
use std::sync::Arc;

pub struct ActionDispatcher {
    store: Arc<dyn MetadataStore>,
    machine: Arc<dyn Machine>,
    scratch: Arc<ScratchRegistry>,
}

impl ActionDispatcher {
    pub fn new(store: Arc<dyn MetadataStore>, machine: Arc<dyn Machine>, scratch: Arc<ScratchRegistry>) -> Self {
        Self { store, machine, scratch }
    }

    /// Pops the entire action queue and applies or re-queues each entry.
    /// Returns `true` iff at least one action was consumed (used by the
    /// control loop's activity signal).
    pub async fn drain(&self) -> Result<bool, WorkerError> {
        let actions = self.store.pop_bundle_actions().await?;
        if actions.is_empty() {
            return Ok(false);
        }

        let mut requeue = Vec::new();
        let mut consumed = 0usize;
        for action in actions {
            match &action.action {
                BundleActionKind::Kill => {
                    if self.machine.kill(action.bundle_uuid).await {
                        self.scratch.record_action(action.bundle_uuid, BundleActionKind::Kill);
                        consumed += 1;
                    } else {
                        tracing::debug!(bundle_uuid = %action.bundle_uuid, "kill not accepted, re-queuing");
                        requeue.push(action);
                    }
                }
                BundleActionKind::Other(kind) => {
                    tracing::debug!(bundle_uuid = %action.bundle_uuid, kind, "unrecognized action, re-queuing");
                    requeue.push(action);
                }
            }
        }

        if !requeue.is_empty() {
            self.store.add_bundle_actions(requeue).await?;
        }

        Ok(consumed > 0)
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
