// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use oj_blobstore::BlobError;
use oj_storage::StoreError;
use thiserror::Error;

/// Failures the worker core surfaces to its caller.
///
/// Most collaborator failures (a conditional update losing a race, a
/// transient store miss) are handled internally by retrying next tick and
/// never reach this type. `WorkerError` is reserved for invariant
/// violations and unrecoverable collaborator errors that should stop the
/// control loop rather than be silently retried forever.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("blob store error: {0}")]
    Blob(#[from] BlobError),

    /// An invariant the spec treats as a programmer error rather than a
    /// runtime condition (e.g. `start()` called on a bundle that isn't
    /// `RUNNING`, or a finalize with no matching `ScratchRecord`).
    #[error("invariant violated: {0}")]
    Invariant(String),
}
