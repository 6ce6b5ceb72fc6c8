// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity signal consumed by the sync manager.
//!
//! The manager never probes the network itself. It asks a [`Connectivity`]
//! source whether it is online and subscribes to changes, so tests and the
//! CLI can drive offline/online transitions deterministically.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Source of the online/offline signal.
pub trait Connectivity: Send + Sync {
    /// Whether the network is currently believed reachable.
    fn is_online(&self) -> bool;

    /// Subscribes to changes. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// In-process connectivity source toggled explicitly.
#[derive(Debug)]
pub struct ManualConnectivity {
    tx: watch::Sender<bool>,
}

impl ManualConnectivity {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        ManualConnectivity { tx }
    }

    pub fn online() -> Self {
        Self::new(true)
    }

    pub fn offline() -> Self {
        Self::new(false)
    }

    /// Sets the state, notifying subscribers only on an actual change.
    pub fn set_online(&self, online: bool) {
        self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
    }
}

impl Connectivity for ManualConnectivity {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Online state plus a sticky "was offline" flag for reconnect notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OfflineTracker {
    pub is_online: bool,
    pub was_offline: bool,
}

impl OfflineTracker {
    pub fn new(is_online: bool) -> Self {
        OfflineTracker {
            is_online,
            was_offline: false,
        }
    }

    /// Records a connectivity change.
    ///
    /// Going offline always sets `was_offline`; coming back online keeps it
    /// set until [`clear_offline_flag`](Self::clear_offline_flag).
    pub fn observe(&mut self, online: bool) {
        if online {
            self.was_offline = self.was_offline || !self.is_online;
            self.is_online = true;
        } else {
            self.is_online = false;
            self.was_offline = true;
        }
    }

    /// Dismisses the reconnect notice.
    pub fn clear_offline_flag(&mut self) {
        self.was_offline = false;
    }
}

/// Handle to a running connectivity subscription.
///
/// Created by [`SyncManager::watch_connectivity`](super::SyncManager::watch_connectivity).
/// Dropping the handle (or calling [`stop`](Self::stop)) cancels the
/// background task and releases the subscription.
#[derive(Debug)]
pub struct ConnectivityWatch {
    cancel_token: CancellationToken,
    tracker: Arc<Mutex<OfflineTracker>>,
    task: Option<JoinHandle<()>>,
}

impl ConnectivityWatch {
    pub(crate) fn new(
        cancel_token: CancellationToken,
        tracker: Arc<Mutex<OfflineTracker>>,
        task: JoinHandle<()>,
    ) -> Self {
        ConnectivityWatch {
            cancel_token,
            tracker,
            task: Some(task),
        }
    }

    /// Current tracker state.
    pub fn tracker(&self) -> OfflineTracker {
        *self.tracker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clear_offline_flag(&self) {
        self.tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear_offline_flag();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Cancels the watch and waits for the background task to exit.
    pub async fn stop(mut self) {
        self.cancel_token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ConnectivityWatch {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
