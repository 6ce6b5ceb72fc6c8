// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sjsync - offline sync queue for the sanjivani client.
//!
//! Local mutations (events, photos, reports, profile changes) are queued
//! while the device is offline and delivered, in order, once connectivity
//! returns.
//!
//! # Main Components
//!
//! - [`sync::SyncManager`] - the queue manager: enqueue, drain, status
//! - [`sync::RemoteRegistry`] - one remote operation per mutation kind
//! - [`Config`] - `config.toml` settings in the data directory
//! - [`Error`] - Error types for all operations
//!
//! # Embedding
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sj_core::{FileStore, MutationKind, SyncAction};
//! use sjsync::sync::{ManualConnectivity, RemoteRegistry, SyncConfig, SyncManager};
//!
//! let connectivity = Arc::new(ManualConnectivity::offline());
//! let manager = SyncManager::new(
//!     SyncConfig::default(),
//!     Arc::new(FileStore::open(dir)?),
//!     RemoteRegistry::simulated(1.0, &[]),
//!     connectivity.clone(),
//! );
//! let _watch = manager.watch_connectivity();
//! manager.enqueue(MutationKind::Event, SyncAction::Create, payload);
//! connectivity.set_online(true); // drains in the background
//! ```

mod cli;
mod commands;
mod display;

pub mod config;
pub mod error;
pub mod logging;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat};
pub use config::{find_data_dir, Config};
pub use error::{Error, Result};

use std::io::Write;

use commands::Context;

/// Execute a parsed command line, writing results to stdout.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(cli.directory.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(&ctx, cli.command, &mut out)
}

/// Execute `command` against `ctx`. This is the testable entry point.
pub(crate) fn run_with(ctx: &Context, command: Command, out: &mut dyn Write) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))?;

    rt.block_on(dispatch(ctx, command, out))
}

async fn dispatch(ctx: &Context, command: Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Enqueue {
            kind,
            action,
            payload,
            sync,
        } => commands::enqueue::run(ctx, kind, action, &payload, sync, out).await,
        Command::Status { output } => commands::status::run(ctx, output, out),
        Command::Drain { offline } => commands::drain::run(ctx, offline, out).await,
        Command::Clear { dropped } => commands::clear::run(ctx, dropped, out),
        Command::Dropped { output } => commands::dropped::run(ctx, output, out),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
