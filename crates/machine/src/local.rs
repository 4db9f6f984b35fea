// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs `RunBundle`s as child processes on the local host.
//!
//! The shell command comes from `bundle.metadata.extra["command"]` — the
//! wire format of a compute backend's launch request is out of scope for
//! the worker core, so this reads the one catch-all field a caller is
//! expected to have populated.

use crate::error::LaunchError;
use crate::{Machine, PollOutcome, Started};
use async_trait::async_trait;
use oj_blobstore::BlobStore;
use oj_core::{Bundle, BundleId};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Child;
use tokio::sync::Mutex;

struct RunningProcess {
    child: Child,
    temp_dir: PathBuf,
}

/// Executes bundles as plain child processes under a configurable root
/// directory, one scratch subdirectory per bundle.
///
/// `max_concurrent` models backend capacity: once that many processes are
/// in flight, further `start()` calls are rejected (recoverable) rather
/// than failed (terminal).
pub struct LocalProcessMachine {
    scratch_root: PathBuf,
    max_concurrent: Option<usize>,
    running: Arc<Mutex<HashMap<BundleId, RunningProcess>>>,
    /// Scratch dirs for bundles `poll()` already handed back to the caller
    /// but that haven't been `finalize()`d yet, so the directory survives
    /// between those two calls instead of being dropped with the entry
    /// `poll()` removed from `running`.
    awaiting_finalize: Arc<Mutex<HashMap<BundleId, PathBuf>>>,
}

impl LocalProcessMachine {
    pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
            max_concurrent: None,
            running: Arc::new(Mutex::new(HashMap::new())),
            awaiting_finalize: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = Some(max);
        self
    }

    fn command_for(bundle: &Bundle) -> Result<String, LaunchError> {
        bundle
            .metadata
            .extra
            .get("command")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| LaunchError::Failed("no command specified in bundle metadata".into()))
    }
}

#[async_trait]
impl Machine for LocalProcessMachine {
    async fn start(
        &self,
        bundle: &Bundle,
        _blob_store: &dyn BlobStore,
        _parents: &HashMap<BundleId, Bundle>,
    ) -> Result<Started, LaunchError> {
        if let Some(max) = self.max_concurrent {
            if self.running.lock().await.len() >= max {
                return Err(LaunchError::Rejected("at capacity".into()));
            }
        }

        let command = Self::command_for(bundle)?;
        let temp_dir = self.scratch_root.join(bundle.uuid.to_string());
        std::fs::create_dir_all(&temp_dir)
            .map_err(|e| LaunchError::Failed(format!("failed to create scratch dir: {e}")))?;

        let child = tokio::process::Command::new("/bin/sh")
            .arg("-c")
            .arg(&command)
            .current_dir(&temp_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| LaunchError::Failed(format!("failed to spawn: {e}")))?;

        self.running.lock().await.insert(bundle.uuid, RunningProcess { child, temp_dir });
        tracing::info!(bundle_uuid = %bundle.uuid, "launched local process");
        Ok(Started)
    }

    async fn poll(&self) -> Option<PollOutcome> {
        let mut running = self.running.lock().await;
        let mut finished = None;
        for (uuid, proc) in running.iter_mut() {
            match proc.child.try_wait() {
                Ok(Some(status)) => {
                    finished = Some((*uuid, status.success()));
                    break;
                }
                Ok(None) => continue,
                Err(_) => {
                    finished = Some((*uuid, false));
                    break;
                }
            }
        }

        let (uuid, success) = finished?;
        let proc = running.remove(&uuid)?;
        drop(running);
        tracing::info!(bundle_uuid = %uuid, success, "local process finished");
        self.awaiting_finalize.lock().await.insert(uuid, proc.temp_dir.clone());
        Some(PollOutcome { bundle_uuid: uuid, success, temp_dir: proc.temp_dir })
    }

    async fn kill(&self, uuid: BundleId) -> bool {
        let mut running = self.running.lock().await;
        match running.get_mut(&uuid) {
            Some(proc) => {
                let _ = proc.child.kill().await;
                true
            }
            None => false,
        }
    }

    async fn finalize(&self, uuid: BundleId) {
        let removed = self.awaiting_finalize.lock().await.remove(&uuid);
        if let Some(temp_dir) = removed {
            let _ = std::fs::remove_dir_all(&temp_dir);
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
