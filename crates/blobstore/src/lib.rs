// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oj-blobstore: content-addressed storage for materialized bundle outputs.
//!
//! The worker core never inspects a blob's internal layout — it uploads a
//! directory and gets back a [`DataHash`] plus whatever incidental metadata
//! (byte size, file count, ...) the store wants to surface on the bundle row.

pub mod error;
pub mod local;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use error::BlobError;
pub use local::LocalBlobStore;

use async_trait::async_trait;
use oj_core::DataHash;
use std::collections::HashMap;
use std::path::Path;

/// Metadata a blob store may attach on upload (e.g. size), merged into the
/// bundle's metadata bag by the caller.
pub type UploadMetadata = HashMap<String, serde_json::Value>;

/// Content-addresses a directory and makes it durably retrievable.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Hash and persist `dir`, returning its content address plus incidental metadata.
    async fn upload(&self, dir: &Path) -> Result<(DataHash, UploadMetadata), BlobError>;

    /// Resolve a previously uploaded hash back to a local path, if this store
    /// can provide one directly (used by local-backend `Machine`s to avoid a
    /// round trip; remote stores may always return `None`).
    async fn local_path(&self, hash: &DataHash) -> Option<std::path::PathBuf>;
}
