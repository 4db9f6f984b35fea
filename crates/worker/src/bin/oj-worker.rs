// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin entry point: load configuration, assemble the reference
//! single-process backends, and hand off to [`Worker::run`].
//!
//! Wiring a real store/backend pair (a networked `MetadataStore`, a
//! Kubernetes or container `Machine`) is left to whoever embeds this
//! worker in a larger deployment; this binary only proves the control
//! loop out with the in-process reference implementations.

use clap::Parser;
use oj_blobstore::local::LocalBlobStore;
use oj_core::SystemClock;
use oj_machine::local::LocalProcessMachine;
use oj_storage::InMemoryMetadataStore;
use oj_worker::{install_shutdown_handler, Worker, WorkerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Drives bundles through the CREATED -> STAGED -> RUNNING -> READY|FAILED
/// state machine until killed or until a bounded iteration count is spent.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file overlaying the compiled-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured sleep interval, in milliseconds.
    #[arg(long)]
    sleep_interval_ms: Option<u64>,

    /// Overrides the configured bounded iteration count (0 = unbounded).
    #[arg(long)]
    iterations: Option<u64>,

    /// Directory the local process backend stages and runs bundles under.
    #[arg(long, default_value = "/var/lib/oj-worker/scratch")]
    scratch_root: PathBuf,

    /// Directory the local blob store commits finalized artifacts under.
    #[arg(long, default_value = "/var/lib/oj-worker/blobs")]
    blob_root: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = WorkerConfig::load(cli.config.as_deref())?;
    if let Some(ms) = cli.sleep_interval_ms {
        config.sleep_interval = std::time::Duration::from_millis(ms);
    }
    if let Some(iterations) = cli.iterations {
        config.iterations = iterations;
    }

    let filter = match config.log_verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(?config, "starting worker");

    let store: Arc<dyn oj_storage::MetadataStore> = Arc::new(InMemoryMetadataStore::new());
    let machine: Arc<dyn oj_machine::Machine> = Arc::new(LocalProcessMachine::new(cli.scratch_root));
    let blob_store: Arc<dyn oj_blobstore::BlobStore> = Arc::new(LocalBlobStore::new(cli.blob_root));

    let worker = Worker::new(store, machine, blob_store, SystemClock);
    let keep_running = install_shutdown_handler();

    worker.run(config.iterations, config.sleep_interval, &keep_running).await?;

    tracing::info!("worker stopped");
    Ok(())
}
