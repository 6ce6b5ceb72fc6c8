// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sj-core: Shared data model for the sanjivani offline sync queue.
//!
//! This crate provides the sync item types, the ordered queue collection
//! and its codec, and the durable store abstraction used by the
//! `sjsync` manager. It has no async runtime dependency.

pub mod error;
pub mod item;
pub mod queue;
pub mod store;

pub use error::{Error, Result};
pub use item::{ItemId, ItemSummary, MutationKind, SyncAction, SyncItem};
pub use queue::SyncQueue;
pub use store::{FileStore, MemoryStore, Store};
