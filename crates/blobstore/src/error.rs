// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors from a [`crate::BlobStore`] implementation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("io error uploading {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("blob not found: {0}")]
    NotFound(String),
}
