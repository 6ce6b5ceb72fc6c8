// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline sync queue.
//!
//! Buffers local mutations while disconnected and delivers them once
//! connectivity returns.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌────────────────┐     ┌─────────────┐
//! │   Manager    │────►│ RemoteRegistry │────►│  RemoteOp   │ (one per kind)
//! │(SyncManager) │     └────────────────┘     └─────────────┘
//! └──────────────┘
//!    │       ▲
//!    ▼       │ online/offline
//! ┌───────┐ ┌──────────────┐
//! │ Store │ │ Connectivity │
//! └───────┘ └──────────────┘
//! ```
//!
//! # Features
//!
//! - FIFO delivery of a per-pass snapshot, removal by item id
//! - Bounded retry with an inspectable dead-letter list
//! - Per-operation timeout
//! - Persist after every mutation
//! - Drain on enqueue while online and on every reconnect
//! - Injectable store, connectivity and remote operations for testing

mod banner;
mod connectivity;
mod manager;
mod remote;

pub use banner::Banner;
pub use connectivity::{Connectivity, ConnectivityWatch, ManualConnectivity, OfflineTracker};
pub use manager::{DrainReport, QueueStatus, SyncConfig, SyncManager, DROPPED_KEY, QUEUE_KEY};
pub use remote::{
    simulated_latency, RemoteError, RemoteFuture, RemoteOp, RemoteRegistry, RemoteResult,
    SimulatedRemote,
};

#[cfg(test)]
mod test_helpers;
