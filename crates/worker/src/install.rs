// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rehydrates a bundle's parent dependencies into its output directory
//! before upload, so the uploaded artifact is self-contained.

use oj_blobstore::BlobStore;
use oj_core::{Bundle, BundleId, Dependency};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("dependency references unknown parent {0}")]
    MissingParent(BundleId),
    #[error("parent {0} has no retrievable artifact")]
    MissingArtifact(BundleId),
    #[error("io error installing dependency: {0}")]
    Io(#[from] std::io::Error),
}

/// Installs every dependency edge of `dependencies` as a relative symlink
/// inside `temp_dir`, resolving each parent's artifact through `blob_store`.
pub async fn install_dependencies(
    blob_store: &dyn BlobStore,
    dependencies: &[Dependency],
    parents: &HashMap<BundleId, Bundle>,
    temp_dir: &Path,
) -> Result<(), InstallError> {
    for dep in dependencies {
        let parent = parents.get(&dep.parent_uuid).ok_or(InstallError::MissingParent(dep.parent_uuid))?;
        let hash = parent.data_hash.clone().ok_or(InstallError::MissingArtifact(dep.parent_uuid))?;
        let parent_root = blob_store.local_path(&hash).await.ok_or(InstallError::MissingArtifact(dep.parent_uuid))?;

        let source = parent_root.join(&dep.parent_path);
        let link = temp_dir.join(&dep.child_path);
        if let Some(link_dir) = link.parent() {
            std::fs::create_dir_all(link_dir)?;
        }

        let link_dir = link.parent().unwrap_or(temp_dir);
        let relative_target = relative_path(link_dir, &source);
        symlink(&relative_target, &link)?;
    }
    Ok(())
}

/// Computes the relative path from `from_dir` to `to`, assuming both are
/// absolute and lexically normal (no `.`/`..` components).
fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from_components: Vec<_> = from_dir.components().collect();
    let to_components: Vec<_> = to.components().collect();
    let common = from_components.iter().zip(to_components.iter()).take_while(|(a, b)| a == b).count();

    let mut result = PathBuf::new();
    for _ in common..from_components.len() {
        result.push("..");
    }
    for component in &to_components[common..] {
        result.push(component.as_os_str());
    }
    result
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::fs::copy(target, link).map(|_| ())
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
