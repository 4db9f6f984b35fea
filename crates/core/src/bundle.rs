// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The bundle: the unit of work the worker drives through its state machine.

use crate::dependency::Dependency;
use crate::hash::DataHash;
use crate::metadata::BundleMetadata;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Opaque, unique identifier for a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleId(pub Uuid);

impl BundleId {
    /// Generate a new random bundle id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BundleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for BundleId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl Borrow<Uuid> for BundleId {
    fn borrow(&self) -> &Uuid {
        &self.0
    }
}

/// What a bundle does once it reaches `RUNNING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BundleKind {
    /// Requires backend execution via the `Machine`.
    Run,
    /// Merely assembles its dependencies into a new artifact; never touches the backend.
    Make,
}

crate::simple_display! {
    BundleKind {
        Run => "run",
        Make => "make",
    }
}

/// Lifecycle position of a bundle.
///
/// Legal transitions (see module docs on [`BundleState::can_transition_to`]):
///
/// ```text
/// CREATED → STAGED | FAILED
/// STAGED  → RUNNING | FAILED
/// RUNNING → READY | FAILED | STAGED   (roll back on launch rejection)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BundleState {
    Created,
    Staged,
    Running,
    Ready,
    Failed,
}

crate::simple_display! {
    BundleState {
        Created => "created",
        Staged => "staged",
        Running => "running",
        Ready => "ready",
        Failed => "failed",
    }
}

impl BundleState {
    /// Whether `self -> next` is one of the edges in the state DAG.
    ///
    /// The `Running -> Staged` edge only fires on launch rejection (the
    /// Launcher rolling back a bundle the backend refused to accept); it is
    /// still a legal edge, not an error path.
    pub fn can_transition_to(self, next: BundleState) -> bool {
        use BundleState::*;
        matches!(
            (self, next),
            (Created, Staged)
                | (Created, Failed)
                | (Staged, Running)
                | (Staged, Failed)
                | (Running, Ready)
                | (Running, Failed)
                | (Running, Staged)
        )
    }
}

/// A unit of work: identity, kind, lifecycle state, dependencies, and an
/// open metadata bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub uuid: BundleId,
    pub kind: BundleKind,
    pub state: BundleState,
    pub data_hash: Option<DataHash>,
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub metadata: BundleMetadata,
}

impl Bundle {
    pub fn new(kind: BundleKind, dependencies: Vec<Dependency>) -> Self {
        Self {
            uuid: BundleId::new(),
            kind,
            state: BundleState::Created,
            data_hash: None,
            dependencies,
            metadata: BundleMetadata::default(),
        }
    }

    /// All distinct parent uuids this bundle depends on.
    pub fn parent_uuids(&self) -> impl Iterator<Item = BundleId> + '_ {
        self.dependencies.iter().map(|d| d.parent_uuid)
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.uuid, self.kind, self.state)
    }
}

#[cfg(test)]
#[path = "bundle_tests.rs"]
mod tests;
