// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered configuration for `Worker::run`: compiled-in defaults, an
//! optional TOML file, then `OJ_WORKER_*` environment variables, each
//! overriding the previous. The binary's `main` applies explicit CLI
//! overrides last, after loading a [`WorkerConfig`] from here.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the control loop's pacing and verbosity.
///
/// Backend/store connection parameters are deliberately absent: they are
/// opaque to the core and belong to whichever `MetadataStore`/`Machine`
/// implementation the binary constructs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// How long to sleep after a tick with no activity.
    #[serde(with = "duration_millis")]
    pub sleep_interval: Duration,

    /// Bounded count of productive iterations to run; `0` means unbounded.
    pub iterations: u64,

    /// Gates which `tracing` spans are emitted at `info` vs `debug`;
    /// higher values surface more detail, mirroring the source's
    /// integer `verbose` knob.
    pub log_verbosity: u8,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { sleep_interval: Duration::from_secs(1), iterations: 0, log_verbosity: 0 }
    }
}

/// What failed while assembling a [`WorkerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("parsing config file {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
    #[error("invalid {field} in OJ_WORKER_{field}: {value}")]
    InvalidEnv { field: &'static str, value: String },
}

impl WorkerConfig {
    /// Loads defaults, then overlays an optional TOML file, then overlays
    /// `OJ_WORKER_*` environment variables. Does not consult `std::env`
    /// for anything but the three fields below; CLI overrides are applied
    /// by the caller afterward via the plain setters.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            let text = std::fs::read_to_string(path)
                .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
            let from_file: Self =
                toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })?;
            config = from_file;
        }

        if let Ok(value) = std::env::var("OJ_WORKER_SLEEP_INTERVAL_MS") {
            let ms: u64 =
                value.parse().map_err(|_| ConfigError::InvalidEnv { field: "SLEEP_INTERVAL_MS", value: value.clone() })?;
            config.sleep_interval = Duration::from_millis(ms);
        }
        if let Ok(value) = std::env::var("OJ_WORKER_ITERATIONS") {
            config.iterations =
                value.parse().map_err(|_| ConfigError::InvalidEnv { field: "ITERATIONS", value: value.clone() })?;
        }
        if let Ok(value) = std::env::var("OJ_WORKER_LOG_VERBOSITY") {
            config.log_verbosity =
                value.parse().map_err(|_| ConfigError::InvalidEnv { field: "LOG_VERBOSITY", value: value.clone() })?;
        }

        Ok(config)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
