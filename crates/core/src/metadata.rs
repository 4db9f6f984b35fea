// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-bundle metadata bag.
//!
//! The source treats metadata as an open string-keyed map. Modeled here as a
//! discriminated record with the known fields the worker itself writes
//! (`failure_message`, `time`, `actions`) plus a catch-all map so collaborators
//! (the REST surface, the backend) can stash forward-compatible fields without
//! the worker needing to know about them.

use crate::action::BundleActionKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Known fields plus an open catch-all, serialized as a single flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// Set when a bundle transitions to `FAILED`, describing why.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,

    /// Wall-clock duration of a `RunBundle`'s execution, set at finalize.
    #[serde(skip_serializing_if = "Option::is_none", with = "duration_secs_f64_opt")]
    pub time: Option<Duration>,

    /// Operator actions (e.g. kill) that were applied while this bundle ran.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub actions: Vec<BundleActionKind>,

    /// Fields neither this worker nor its collaborators know the shape of yet.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl BundleMetadata {
    pub fn with_failure(message: impl Into<String>) -> Self {
        Self { failure_message: Some(message.into()), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.failure_message.is_none() && self.time.is_none() && self.actions.is_empty() && self.extra.is_empty()
    }
}

mod duration_secs_f64_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_f64(d.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<f64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs_f64))
    }
}
