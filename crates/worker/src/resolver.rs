// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advances `CREATED` bundles once their parents' fates are known.

use crate::error::WorkerError;
use oj_core::{Bundle, BundleId, BundleMetadata, BundleState};
use oj_storage::{BundleFilter, BundleUpdate, MetadataStore};
use std::collections::HashMap;
use std::sync::Arc;

pub struct DependencyResolver {
    store: Arc<dyn MetadataStore>,
}

enum Classification {
    /// A parent hasn't appeared in the store yet; try again next tick.
    Skip,
    Fail { failed_parents: Vec<BundleId> },
    Stage,
    /// At least one parent is still in flight.
    Leave,
}

fn classify(bundle: &Bundle, parents: &HashMap<BundleId, Bundle>) -> Classification {
    let mut failed_parents = Vec::new();
    let mut all_ready = true;

    for parent_uuid in bundle.parent_uuids() {
        let Some(parent) = parents.get(&parent_uuid) else {
            return Classification::Skip;
        };
        match parent.state {
            BundleState::Failed => failed_parents.push(parent_uuid),
            BundleState::Ready => {}
            _ => all_ready = false,
        }
    }

    if !failed_parents.is_empty() {
        return Classification::Fail { failed_parents };
    }
    if all_ready {
        Classification::Stage
    } else {
        Classification::Leave
    }
}

impl DependencyResolver {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self { store }
    }

    /// Returns `true` iff any `CREATED` bundle committed a transition this tick.
    pub async fn advance(&self) -> Result<bool, WorkerError> {
        let created = self.store.batch_get_bundles(BundleFilter::by_state(BundleState::Created)).await?;
        if created.is_empty() {
            return Ok(false);
        }

        let parent_uuids: std::collections::HashSet<BundleId> =
            created.iter().flat_map(|b| b.parent_uuids()).collect();
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

        let mut to_stage = Vec::new();
        let mut committed = false;

        for bundle in &created {
            match classify(bundle, &parents) {
                Classification::Skip | Classification::Leave => {}
                Classification::Stage => to_stage.push(bundle.uuid),
                Classification::Fail { failed_parents } => {
                    let message = format!(
                        "Parent bundles failed: {}",
                        failed_parents.iter().map(BundleId::to_string).collect::<Vec<_>>().join(", ")
                    );
                    let update = BundleUpdate {
                        state: Some(BundleState::Failed),
                        metadata: Some(BundleMetadata::with_failure(message)),
                        ..BundleUpdate::default()
                    };
                    let ok = self
                        .store
                        .batch_update_bundles(&[bundle.uuid], update, BundleState::Created)
                        .await?;
                    committed |= ok;
                }
            }
        }

        if !to_stage.is_empty() {
            let ok = self
                .store
                .batch_update_bundles(&to_stage, BundleUpdate::to_state(BundleState::Staged), BundleState::Created)
                .await?;
            committed |= ok;
        }

        Ok(committed)
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
