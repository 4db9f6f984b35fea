// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
fn defaults_when_nothing_overlays() {
    let config = WorkerConfig::default();
    assert_eq!(config.sleep_interval, Duration::from_secs(1));
    assert_eq!(config.iterations, 0);
    assert_eq!(config.log_verbosity, 0);
}

#[test]
fn file_overlay_replaces_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("oj-worker.toml");
    std::fs::write(&path, "sleep_interval = 250\niterations = 5\nlog_verbosity = 2\n").unwrap();

    let config = WorkerConfig::load(Some(&path)).unwrap();
    assert_eq!(config.sleep_interval, Duration::from_millis(250));
    assert_eq!(config.iterations, 5);
    assert_eq!(config.log_verbosity, 2);
}

#[test]
#[serial]
fn env_overlay_wins_over_file_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("oj-worker.toml");
    std::fs::write(&path, "iterations = 5\n").unwrap();

    std::env::set_var("OJ_WORKER_ITERATIONS", "9");
    let config = WorkerConfig::load(Some(&path)).unwrap();
    std::env::remove_var("OJ_WORKER_ITERATIONS");

    assert_eq!(config.iterations, 9);
}

#[test]
#[serial]
fn invalid_env_value_is_reported() {
    std::env::set_var("OJ_WORKER_ITERATIONS", "not-a-number");
    let result = WorkerConfig::load(None);
    std::env::remove_var("OJ_WORKER_ITERATIONS");

    assert!(matches!(result, Err(ConfigError::InvalidEnv { field: "ITERATIONS", .. })));
}

#[test]
fn missing_config_file_is_an_error() {
    let result = WorkerConfig::load(Some(Path::new("/nonexistent/oj-worker.toml")));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}
