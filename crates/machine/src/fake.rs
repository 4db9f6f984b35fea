// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `Machine` for worker-level tests.
//!
//! Scripts every launch's outcome up front rather than actually running
//! anything: tests arrange `FakeMachine::new()`, script a `start` outcome
//! and/or a `poll` outcome per bundle, then drive the worker components
//! directly.

use crate::error::LaunchError;
use crate::{Machine, PollOutcome, Started};
use async_trait::async_trait;
use oj_blobstore::BlobStore;
use oj_core::{Bundle, BundleId};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

#[derive(Default)]
struct State {
    /// Scripted `start()` responses, consumed in FIFO order per bundle uuid
    /// with no script falling back to `Ok(Started)`.
    start_scripts: HashMap<BundleId, Result<Started, LaunchError>>,
    running: HashMap<BundleId, PathBuf>,
    /// Completed outcomes waiting to be handed out by `poll`, in arrival order.
    completed: VecDeque<PollOutcome>,
    killed: Vec<BundleId>,
    kill_scripts: HashMap<BundleId, bool>,
    finalized: Vec<BundleId>,
}

#[derive(Default, Clone)]
pub struct FakeMachine {
    state: std::sync::Arc<Mutex<State>>,
}

impl FakeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arranges for `start()` on `uuid` to return `result`.
    pub fn script_start(&self, uuid: BundleId, result: Result<Started, LaunchError>) {
        self.state.lock().start_scripts.insert(uuid, result);
    }

    /// Arranges for `kill()` on `uuid` to return `accepted`.
    pub fn script_kill(&self, uuid: BundleId, accepted: bool) {
        self.state.lock().kill_scripts.insert(uuid, accepted);
    }

    /// Makes a running bundle available from the next `poll()` call.
    pub fn complete(&self, uuid: BundleId, success: bool, temp_dir: impl Into<PathBuf>) {
        self.state.lock().completed.push_back(PollOutcome { bundle_uuid: uuid, success, temp_dir: temp_dir.into() });
    }

    pub fn killed(&self) -> Vec<BundleId> {
        self.state.lock().killed.clone()
    }

    pub fn finalized(&self) -> Vec<BundleId> {
        self.state.lock().finalized.clone()
    }

    pub fn is_running(&self, uuid: BundleId) -> bool {
        self.state.lock().running.contains_key(&uuid)
    }
}

#[async_trait]
impl Machine for FakeMachine {
    async fn start(
        &self,
        bundle: &Bundle,
        _blob_store: &dyn BlobStore,
        _parents: &HashMap<BundleId, Bundle>,
    ) -> Result<Started, LaunchError> {
        let mut state = self.state.lock();
        let result = state
            .start_scripts
            .remove(&bundle.uuid)
            .unwrap_or(Ok(Started));
        if result.is_ok() {
            state.running.insert(bundle.uuid, std::env::temp_dir().join(bundle.uuid.to_string()));
        }
        result
    }

    async fn poll(&self) -> Option<PollOutcome> {
        self.state.lock().completed.pop_front()
    }

    async fn kill(&self, uuid: BundleId) -> bool {
        let mut state = self.state.lock();
        let accepted = state.kill_scripts.remove(&uuid).unwrap_or_else(|| state.running.contains_key(&uuid));
        if accepted {
            state.killed.push(uuid);
        }
        accepted
    }

    async fn finalize(&self, uuid: BundleId) {
        let mut state = self.state.lock();
        state.running.remove(&uuid);
        state.finalized.push(uuid);
    }
}
