// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oj-worker: the bundle execution worker core.
//!
//! A [`Worker`] assembles five cooperating components — [`ActionDispatcher`],
//! [`DependencyResolver`], [`Launcher`], [`Finalizer`], and the
//! [`ScratchRegistry`] they share — into a single fixed-interval
//! [`control_loop`] that drives bundles through `CREATED → STAGED → RUNNING
//! → READY | FAILED`. Durable effects go through a [`MetadataStore`]
//! (`oj-storage`); process effects go through a [`Machine`] (`oj-machine`);
//! finalized artifacts go through a [`BlobStore`] (`oj-blobstore`).
//!
//! [`MetadataStore`]: oj_storage::MetadataStore
//! [`Machine`]: oj_machine::Machine
//! [`BlobStore`]: oj_blobstore::BlobStore

pub mod config;
pub mod control_loop;
pub mod dispatcher;
pub mod error;
pub mod finalizer;
pub mod install;
pub mod launcher;
pub mod resolver;
pub mod scratch;

pub use config::{ConfigError, WorkerConfig};
pub use control_loop::{install_shutdown_handler, Worker};
pub use dispatcher::ActionDispatcher;
pub use error::WorkerError;
pub use finalizer::{FinalizeInput, Finalizer};
pub use install::{install_dependencies, InstallError};
pub use launcher::Launcher;
pub use resolver::DependencyResolver;
pub use scratch::{ScratchRecord, ScratchRegistry};
