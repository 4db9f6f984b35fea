// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use oj_blobstore::LocalBlobStore;
use oj_core::{Bundle, BundleState};
use std::fs;

#[tokio::test]
async fn installs_a_relative_symlink_to_the_parent_artifact() {
    let blob_root = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(blob_root.path());

    let parent_output = tempfile::tempdir().unwrap();
    fs::write(parent_output.path().join("out.txt"), b"hello").unwrap();
    let (hash, _) = store.upload(parent_output.path()).await.unwrap();

    let mut parent = Bundle::builder().state(BundleState::Ready).build();
    parent.data_hash = Some(hash);
    let dep = Dependency::new(parent.uuid, "out.txt", "input/out.txt");
    let parents = HashMap::from([(parent.uuid, parent.clone())]);

    let temp_dir = tempfile::tempdir().unwrap();
    install_dependencies(&store, &[dep], &parents, temp_dir.path()).await.unwrap();

    let installed = temp_dir.path().join("input/out.txt");
    assert!(installed.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(fs::read_to_string(&installed).unwrap(), "hello");
}

#[tokio::test]
async fn missing_parent_is_an_error() {
    let blob_root = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(blob_root.path());
    let dep = Dependency::new(BundleId::new(), "out.txt", "input/out.txt");
    let temp_dir = tempfile::tempdir().unwrap();

    let err = install_dependencies(&store, &[dep], &HashMap::new(), temp_dir.path()).await.unwrap_err();
    assert!(matches!(err, InstallError::MissingParent(_)));
}

#[tokio::test]
async fn parent_without_an_artifact_is_an_error() {
    let blob_root = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(blob_root.path());
    let parent = Bundle::builder().build();
    let dep = Dependency::new(parent.uuid, "out.txt", "input/out.txt");
    let parents = HashMap::from([(parent.uuid, parent.clone())]);
    let temp_dir = tempfile::tempdir().unwrap();

    let err = install_dependencies(&store, &[dep], &parents, temp_dir.path()).await.unwrap_err();
    assert!(matches!(err, InstallError::MissingArtifact(_)));
}

#[test]
fn relative_path_computes_ascents_and_descents() {
    let from = Path::new("/a/b/c");
    let to = Path::new("/a/x/y");
    assert_eq!(relative_path(from, to), PathBuf::from("../../x/y"));
}
