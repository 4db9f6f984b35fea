// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oj-machine: the compute backend interface the worker core launches,
//! polls, kills, and finalizes bundles through.
//!
//! The worker never inspects backend internals beyond this trait: a
//! `RunBundle` is a black box from `start()` to the moment `poll()` hands
//! back its outcome.

pub mod error;
pub mod local;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use error::LaunchError;
pub use local::LocalProcessMachine;

use async_trait::async_trait;
use oj_blobstore::BlobStore;
use oj_core::{Bundle, BundleId};
use std::collections::HashMap;
use std::path::PathBuf;

/// Acknowledges a successful launch. Carries no data today; its role is to
/// give `start`'s success arm a name distinct from `()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Started;

/// One bundle's completed execution, as handed back by `Machine::poll`.
#[derive(Debug)]
pub struct PollOutcome {
    pub bundle_uuid: BundleId,
    pub success: bool,
    pub temp_dir: PathBuf,
}

/// A compute backend capable of running `RunBundle`s.
///
/// Implementations own all backend-side state (child processes, containers,
/// remote job handles); the worker core only ever sees this interface.
#[async_trait]
pub trait Machine: Send + Sync {
    /// Begin executing `bundle`. `parents` is the fully resolved parent map
    /// keyed by uuid, as needed to materialize dependencies into the run
    /// directory.
    async fn start(
        &self,
        bundle: &Bundle,
        blob_store: &dyn BlobStore,
        parents: &HashMap<BundleId, Bundle>,
    ) -> Result<Started, LaunchError>;

    /// Non-blocking check for a finished bundle. Returns at most one
    /// completed bundle per call; callers should call repeatedly until
    /// `None` to drain everything ready in a single tick.
    async fn poll(&self) -> Option<PollOutcome>;

    /// Attempt to terminate a running bundle. Returns `true` iff this
    /// machine actually had the bundle running and terminated it.
    async fn kill(&self, uuid: BundleId) -> bool;

    /// Release backend-side resources held for `uuid` after its artifact
    /// has been durably uploaded. Best-effort; has no failure mode visible
    /// to the caller.
    async fn finalize(&self, uuid: BundleId);
}
