// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders shared by downstream crates (gated behind `test-support`).

use crate::bundle::{Bundle, BundleId, BundleKind, BundleState};
use crate::dependency::Dependency;
use crate::metadata::BundleMetadata;

crate::builder! {
    pub struct BundleBuilder => Bundle {
        set { kind: BundleKind = BundleKind::Run }
        set { state: BundleState = BundleState::Created }
        set { dependencies: Vec<Dependency> = Vec::new() }
        set { metadata: BundleMetadata = BundleMetadata::default() }
        computed { uuid: BundleId = BundleId::new() }
        computed { data_hash: Option<crate::hash::DataHash> = None }
    }
}

impl BundleBuilder {
    pub fn depends_on(mut self, parent: BundleId) -> Self {
        self.dependencies.push(Dependency::new(parent, "", ""));
        self
    }
}
