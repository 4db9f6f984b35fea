// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Query and update shapes for [`crate::MetadataStore`].

use oj_core::{BundleId, BundleMetadata, BundleState, DataHash};
use std::collections::HashSet;

/// Selects which bundles `batch_get_bundles` returns.
///
/// An empty filter (`BundleFilter::default()`) matches nothing — callers
/// must narrow by uuid set, state, or both, mirroring the source's
/// `batch_get_bundles(uuid=..., state=...)` keyword-only contract.
#[derive(Debug, Clone, Default)]
pub struct BundleFilter {
    pub uuids: Option<HashSet<BundleId>>,
    pub state: Option<BundleState>,
}

impl BundleFilter {
    pub fn by_state(state: BundleState) -> Self {
        Self { uuids: None, state: Some(state) }
    }

    pub fn by_uuids(uuids: impl IntoIterator<Item = BundleId>) -> Self {
        Self { uuids: Some(uuids.into_iter().collect()), state: None }
    }

    pub(crate) fn matches(&self, bundle: &oj_core::Bundle) -> bool {
        if let Some(state) = self.state {
            if bundle.state != state {
                return false;
            }
        }
        if let Some(uuids) = &self.uuids {
            if !uuids.contains(&bundle.uuid) {
                return false;
            }
        }
        self.state.is_some() || self.uuids.is_some()
    }
}

/// A partial update applied to one or more bundle rows.
///
/// `data_hash` is `Option<Option<DataHash>>` so an update can distinguish
/// "don't touch data_hash" (`None`) from "clear it" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct BundleUpdate {
    pub state: Option<BundleState>,
    pub data_hash: Option<Option<DataHash>>,
    pub metadata: Option<BundleMetadata>,
}

impl BundleUpdate {
    pub fn to_state(state: BundleState) -> Self {
        Self { state: Some(state), ..Self::default() }
    }

    pub fn apply(&self, bundle: &mut oj_core::Bundle) {
        if let Some(state) = self.state {
            bundle.state = state;
        }
        if let Some(hash) = self.data_hash.clone() {
            bundle.data_hash = hash;
        }
        if let Some(metadata) = self.metadata.clone() {
            bundle.metadata = metadata;
        }
    }
}
