// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-interval tick driver: sequences the four reconciliation passes
//! and decides whether to sleep or press on.

use crate::dispatcher::ActionDispatcher;
use crate::error::WorkerError;
use crate::finalizer::Finalizer;
use crate::launcher::Launcher;
use crate::resolver::DependencyResolver;
use crate::scratch::ScratchRegistry;
use oj_blobstore::BlobStore;
use oj_core::Clock;
use oj_machine::Machine;
use oj_storage::MetadataStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Assembles the five cooperating components into the single control loop
/// described by the worker's data flow: dispatch, resolve, launch, reap.
pub struct Worker<C: Clock> {
    dispatcher: ActionDispatcher,
    resolver: DependencyResolver,
    launcher: Launcher<C>,
    finalizer: Finalizer<C>,
}

impl<C: Clock> Worker<C> {
    pub fn new(store: Arc<dyn MetadataStore>, machine: Arc<dyn Machine>, blob_store: Arc<dyn BlobStore>, clock: C) -> Self {
        let scratch = Arc::new(ScratchRegistry::new());
        Self {
            dispatcher: ActionDispatcher::new(store.clone(), machine.clone(), scratch.clone()),
            resolver: DependencyResolver::new(store.clone()),
            launcher: Launcher::new(store.clone(), machine.clone(), blob_store.clone(), scratch.clone(), clock.clone()),
            finalizer: Finalizer::new(store, machine, blob_store, scratch, clock),
        }
    }

    /// Runs either forever (`iterations == 0`) or for a bounded count of
    /// *productive* iterations. A tick is productive iff the dispatcher,
    /// launcher, or finalizer reported activity; resolver progress alone
    /// does not advance the counter, since it can fire every tick while
    /// nothing is actually executing.
    ///
    /// `keep_running` is checked only at the sleep boundary, never
    /// mid-tick: a signal handler clearing it never interrupts an
    /// in-flight state transition.
    pub async fn run(&self, iterations: u64, sleep_interval: Duration, keep_running: &AtomicBool) -> Result<(), WorkerError> {
        let mut completed = 0u64;
        loop {
            let tick_span = tracing::info_span!("worker.tick", iteration = completed);
            let _guard = tick_span.enter();

            let dispatched = self.dispatcher.drain().await?;
            tracing::debug!(dispatched, "dispatcher.drain");

            let resolved = self.resolver.advance().await?;
            tracing::debug!(resolved, "resolver.advance");

            let launched = self.launcher.advance().await?;
            tracing::debug!(launched, "launcher.advance");

            let reaped = self.finalizer.reap().await?;
            tracing::debug!(reaped, "finalizer.reap");

            let productive = dispatched || launched || reaped;

            drop(_guard);

            if productive {
                completed += 1;
                if iterations != 0 && completed >= iterations {
                    return Ok(());
                }
                continue;
            }

            if !keep_running.load(Ordering::SeqCst) {
                return Ok(());
            }
            tokio::time::sleep(sleep_interval).await;
            if !keep_running.load(Ordering::SeqCst) {
                return Ok(());
            }
        }
    }
}

/// Installs handlers for `SIGINT`/`SIGTERM` (on Unix) or Ctrl-C (elsewhere)
/// that clear the returned flag. The control loop polls the flag only at
/// its sleep boundary, so a signal received mid-tick takes effect on the
/// next quiescent point rather than interrupting a state transition.
pub fn install_shutdown_handler() -> Arc<AtomicBool> {
    let keep_running = Arc::new(AtomicBool::new(true));

    #[cfg(unix)]
    {
        let flag = keep_running.clone();
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};
            let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
                return;
            };
            tokio::select! {
                _ = sigterm.recv() => {}
                _ = tokio::signal::ctrl_c() => {}
            }
            tracing::info!("shutdown signal received, finishing current tick");
            flag.store(false, Ordering::SeqCst);
        });
    }

    #[cfg(not(unix))]
    {
        let flag = keep_running.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received, finishing current tick");
                flag.store(false, Ordering::SeqCst);
            }
        });
    }

    keep_running
}

#[cfg(test)]
#[path = "control_loop_tests.rs"]
mod tests;
