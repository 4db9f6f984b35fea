// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Failure to begin executing a bundle on a compute backend.
///
/// `Rejected` is recoverable: the caller rolls the bundle back to `Staged`
/// and may retry later. `Failed` is terminal: the caller finalizes the
/// bundle as failed without a further launch attempt.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("backend rejected launch: {0}")]
    Rejected(String),
    #[error("backend launch failed: {0}")]
    Failed(String),
}
