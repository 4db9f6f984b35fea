// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-local bookkeeping for bundles between `Launcher::start` and
//! `Finalizer::finalize`.
//!
//! No cross-worker visibility: if the process dies with live entries, the
//! corresponding `RUNNING` rows are orphaned in the store until operator
//! intervention. That is accepted, not handled here.

use crate::error::WorkerError;
use oj_core::{Bundle, BundleActionKind, BundleId, Dependency};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Instant;

/// What the Launcher captured at `start()` time, needed again at finalize.
pub struct ScratchRecord {
    pub start_time: Instant,
    pub dependencies: Vec<Dependency>,
    pub parents: HashMap<BundleId, Bundle>,
    pub applied_actions: Vec<BundleActionKind>,
}

impl ScratchRecord {
    fn new(start_time: Instant, dependencies: Vec<Dependency>, parents: HashMap<BundleId, Bundle>) -> Self {
        Self { start_time, dependencies, parents, applied_actions: Vec::new() }
    }
}

#[derive(Default)]
pub struct ScratchRegistry {
    records: Mutex<HashMap<BundleId, ScratchRecord>>,
}

impl ScratchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh record for a bundle that just began execution.
    ///
    /// Calling this twice for the same uuid without an intervening
    /// `consume` is a programmer error: the Launcher only starts a bundle
    /// once per `STAGED → RUNNING` transition, so a live record already
    /// existing means a caller skipped finalize or re-started a running
    /// bundle.
    pub fn begin(
        &self,
        uuid: BundleId,
        start_time: Instant,
        dependencies: Vec<Dependency>,
        parents: HashMap<BundleId, Bundle>,
    ) {
        let mut records = self.records.lock();
        assert!(
            !records.contains_key(&uuid),
            "ScratchRegistry::begin called for a bundle with a live record: {uuid}"
        );
        records.insert(uuid, ScratchRecord::new(start_time, dependencies, parents));
    }

    /// Append an applied action (e.g. a successful kill) to a live record.
    /// A missing record is tolerated: the bundle may have finalized between
    /// the dispatcher deciding to act and recording the outcome.
    pub fn record_action(&self, uuid: BundleId, action: BundleActionKind) {
        if let Some(record) = self.records.lock().get_mut(&uuid) {
            record.applied_actions.push(action);
        }
    }

    /// Remove and return the record for `uuid`. Absence is a fatal
    /// invariant violation per the finalize contract.
    pub fn consume(&self, uuid: BundleId) -> Result<ScratchRecord, WorkerError> {
        self.records
            .lock()
            .remove(&uuid)
            .ok_or_else(|| WorkerError::Invariant(format!("no ScratchRecord for bundle {uuid}")))
    }

    /// Number of live records. Mainly a test/observability convenience, but
    /// cheap and harmless to expose unconditionally.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "scratch_tests.rs"]
mod tests;
