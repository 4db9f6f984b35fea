// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content address of a bundle's materialized output directory.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content address of a bundle's output directory in the blob store.
///
/// Opaque to the worker core beyond equality and display: it is produced by
/// `BlobStore::upload` and stored verbatim on `Bundle::data_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataHash(String);

impl DataHash {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DataHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DataHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
