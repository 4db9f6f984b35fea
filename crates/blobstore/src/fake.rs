// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory fake `BlobStore` for worker-level tests, mirroring the shape of
//! `oj-machine`'s `FakeMachine`.

use crate::error::BlobError;
use crate::{BlobStore, UploadMetadata};
use async_trait::async_trait;
use oj_core::DataHash;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
struct State {
    uploads: Vec<PathBuf>,
    paths: HashMap<DataHash, PathBuf>,
}

/// Assigns a deterministic incrementing hash to every uploaded directory
/// rather than actually hashing content — enough to exercise the worker's
/// finalize contract without filesystem I/O.
#[derive(Clone)]
pub struct FakeBlobStore {
    state: Arc<Mutex<State>>,
    next_id: Arc<AtomicU64>,
    fail_next_upload: Arc<Mutex<Option<String>>>,
}

impl Default for FakeBlobStore {
    fn default() -> Self {
        Self { state: Arc::new(Mutex::new(State::default())), next_id: Arc::new(AtomicU64::new(1)), fail_next_upload: Arc::new(Mutex::new(None)) }
    }
}

impl FakeBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arranges for the next `upload` call to fail with `message`.
    pub fn fail_next_upload(&self, message: impl Into<String>) {
        *self.fail_next_upload.lock() = Some(message.into());
    }

    pub fn uploaded_dirs(&self) -> Vec<PathBuf> {
        self.state.lock().uploads.clone()
    }
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    async fn upload(&self, dir: &Path) -> Result<(DataHash, UploadMetadata), BlobError> {
        if let Some(message) = self.fail_next_upload.lock().take() {
            return Err(BlobError::Io {
                path: dir.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, message),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let hash = DataHash::new(format!("fake-{id}"));
        let mut state = self.state.lock();
        state.uploads.push(dir.to_path_buf());
        state.paths.insert(hash.clone(), dir.to_path_buf());
        Ok((hash, UploadMetadata::new()))
    }

    async fn local_path(&self, hash: &DataHash) -> Option<PathBuf> {
        self.state.lock().paths.get(hash).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_uploads_and_assigns_distinct_hashes() {
        let store = FakeBlobStore::new();
        let (a, _) = store.upload(Path::new("/tmp/a")).await.unwrap();
        let (b, _) = store.upload(Path::new("/tmp/b")).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.uploaded_dirs(), vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")]);
    }

    #[tokio::test]
    async fn fail_next_upload_fails_exactly_once() {
        let store = FakeBlobStore::new();
        store.fail_next_upload("disk full");
        assert!(store.upload(Path::new("/tmp/a")).await.is_err());
        assert!(store.upload(Path::new("/tmp/a")).await.is_ok());
    }
}
