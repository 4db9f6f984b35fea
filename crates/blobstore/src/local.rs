// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem-backed, content-addressed `BlobStore`.
//!
//! Layout under `root`:
//! - `<hash>/` — the uploaded directory, moved in verbatim.
//! - `<hash>.manifest.zst` — zstd-compressed `{relative_path: sha256}` manifest,
//!   kept alongside for integrity checks without re-hashing the whole tree.

use crate::error::BlobError;
use crate::{BlobStore, UploadMetadata};
use async_trait::async_trait;
use oj_core::DataHash;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn io_err(path: &Path, source: std::io::Error) -> BlobError {
        BlobError::Io { path: path.display().to_string(), source }
    }

    /// Recursively hashes every regular file under `dir`, relative to `dir`.
    fn manifest(dir: &Path) -> Result<BTreeMap<String, String>, BlobError> {
        let mut manifest = BTreeMap::new();
        let mut stack = vec![dir.to_path_buf()];
        while let Some(current) = stack.pop() {
            let entries = std::fs::read_dir(&current).map_err(|e| Self::io_err(&current, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| Self::io_err(&current, e))?;
                let path = entry.path();
                let file_type = entry.file_type().map_err(|e| Self::io_err(&path, e))?;
                if file_type.is_dir() {
                    stack.push(path);
                    continue;
                }
                let bytes = std::fs::read(&path).map_err(|e| Self::io_err(&path, e))?;
                let digest = hex::encode(Sha256::digest(&bytes));
                let rel = path.strip_prefix(dir).unwrap_or(&path).to_string_lossy().replace('\\', "/");
                manifest.insert(rel, digest);
            }
        }
        Ok(manifest)
    }

    fn combined_hash(manifest: &BTreeMap<String, String>) -> DataHash {
        let mut hasher = Sha256::new();
        for (path, digest) in manifest {
            hasher.update(path.as_bytes());
            hasher.update(b"\0");
            hasher.update(digest.as_bytes());
            hasher.update(b"\n");
        }
        DataHash::new(hex::encode(hasher.finalize()))
    }

    fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(dst)?;
        for entry in std::fs::read_dir(src)? {
            let entry = entry?;
            let dst_path = dst.join(entry.file_name());
            if entry.file_type()?.is_dir() {
                Self::copy_dir_all(&entry.path(), &dst_path)?;
            } else {
                std::fs::copy(entry.path(), dst_path)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, dir: &Path) -> Result<(DataHash, UploadMetadata), BlobError> {
        let dir = dir.to_path_buf();
        let root = self.root.clone();
        let root_display = root.display().to_string();
        tokio::task::spawn_blocking(move || {
            let manifest = LocalBlobStore::manifest(&dir)?;
            let hash = LocalBlobStore::combined_hash(&manifest);

            let dest = root.join(hash.as_str());
            if !dest.exists() {
                LocalBlobStore::copy_dir_all(&dir, &dest).map_err(|e| LocalBlobStore::io_err(&dest, e))?;
            }

            let manifest_json = serde_json::to_vec(&manifest).map_err(|e| BlobError::Io {
                path: dest.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            })?;
            let compressed = zstd::encode_all(manifest_json.as_slice(), 0)
                .map_err(|e| LocalBlobStore::io_err(&dest, e))?;
            let manifest_path = root.join(format!("{}.manifest.zst", hash.as_str()));
            std::fs::write(&manifest_path, compressed).map_err(|e| LocalBlobStore::io_err(&manifest_path, e))?;

            let mut meta = UploadMetadata::new();
            meta.insert("file_count".into(), serde_json::json!(manifest.len()));
            Ok((hash, meta))
        })
        .await
        .map_err(|e| BlobError::Io {
            path: root_display,
            source: std::io::Error::new(std::io::ErrorKind::Other, e),
        })?
    }

    async fn local_path(&self, hash: &DataHash) -> Option<PathBuf> {
        let path = self.root.join(hash.as_str());
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
