// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory reference `MetadataStore`.
//!
//! Exercises the exact conditional-update contract a production store (a
//! relational database, typically) must honor, without needing one. Safe to
//! share across tokio tasks within a single process: [`InMemoryMetadataStore`]
//! is `Clone` and every clone refers to the same underlying tables.

use crate::error::StoreError;
use crate::types::{BundleFilter, BundleUpdate};
use crate::MetadataStore;
use async_trait::async_trait;
use oj_core::{Bundle, BundleAction, BundleId, BundleState};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

#[derive(Default)]
struct Tables {
    bundles: HashMap<BundleId, Bundle>,
    actions: VecDeque<BundleAction>,
}

/// Process-local store, standing in for a real database in tests and for
/// the single-worker reference deployment.
#[derive(Clone, Default)]
pub struct InMemoryMetadataStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bundle rows currently stored. Test-only convenience.
    pub fn len(&self) -> usize {
        self.tables.lock().bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn batch_get_bundles(&self, filter: BundleFilter) -> Result<Vec<Bundle>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables.bundles.values().filter(|b| filter.matches(b)).cloned().collect())
    }

    async fn batch_update_bundles(
        &self,
        uuids: &[BundleId],
        update: BundleUpdate,
        condition: BundleState,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock();

        for uuid in uuids {
            match tables.bundles.get(uuid) {
                Some(b) if b.state == condition => {}
                Some(_) => return Ok(false),
                None => return Err(StoreError::NotFound(uuid.to_string())),
            }
        }

        for uuid in uuids {
            if let Some(bundle) = tables.bundles.get_mut(uuid) {
                update.apply(bundle);
            }
        }
        Ok(true)
    }

    async fn update_bundle(&self, uuid: BundleId, update: BundleUpdate) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        let bundle = tables.bundles.get_mut(&uuid).ok_or_else(|| StoreError::NotFound(uuid.to_string()))?;
        update.apply(bundle);
        Ok(())
    }

    async fn pop_bundle_actions(&self) -> Result<Vec<BundleAction>, StoreError> {
        let mut tables = self.tables.lock();
        Ok(tables.actions.drain(..).collect())
    }

    async fn add_bundle_actions(&self, actions: Vec<BundleAction>) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        tables.actions.extend(actions);
        Ok(())
    }

    async fn insert_bundle(&self, bundle: Bundle) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        tables.bundles.insert(bundle.uuid, bundle);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
