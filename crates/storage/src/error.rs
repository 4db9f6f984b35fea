// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by a [`crate::MetadataStore`] implementation.

use thiserror::Error;

/// Failures a `MetadataStore` backend can report.
///
/// A conditional update *losing the race* is not one of these — `false` is a
/// normal return value for `batch_update_bundles`, not an error. These
/// variants are reserved for the store itself being unavailable or behaving
/// inconsistently.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bundle not found: {0}")]
    NotFound(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
