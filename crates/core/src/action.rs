// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator-issued commands queued against running bundles.

use crate::bundle::BundleId;
use serde::{Deserialize, Serialize};

/// A command an operator can issue against a bundle.
///
/// Open beyond `Kill` so the queue stays forward-compatible: a worker that
/// doesn't recognize a future action kind re-queues it for a worker that does,
/// rather than dropping or erroring on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BundleActionKind {
    Kill,
    /// Anything this worker build doesn't recognize yet.
    Other(String),
}

impl std::fmt::Display for BundleActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BundleActionKind::Kill => write!(f, "kill"),
            BundleActionKind::Other(s) => write!(f, "other({s})"),
        }
    }
}

/// A single queued command: which bundle, and what to do to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleAction {
    pub bundle_uuid: BundleId,
    pub action: BundleActionKind,
}

impl BundleAction {
    pub fn kill(bundle_uuid: BundleId) -> Self {
        Self { bundle_uuid, action: BundleActionKind::Kill }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
