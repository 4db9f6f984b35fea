// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single parent→child input binding for a bundle.

use crate::bundle::BundleId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Binds a path inside a parent bundle's output to a path inside this
/// bundle's working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub parent_uuid: BundleId,
    /// Path within the parent's output directory to expose.
    pub parent_path: PathBuf,
    /// Path within the child's working directory where it is installed.
    pub child_path: PathBuf,
}

impl Dependency {
    pub fn new(parent_uuid: BundleId, parent_path: impl Into<PathBuf>, child_path: impl Into<PathBuf>) -> Self {
        Self { parent_uuid, parent_path: parent_path.into(), child_path: child_path.into() }
    }
}
