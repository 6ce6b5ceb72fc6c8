// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync queue manager.
//!
//! Buffers local mutations and delivers them once connectivity is available:
//! - Enqueue persists immediately and, when online, spawns a drain
//! - Drain processes a snapshot of the queue in FIFO order, one item at a time
//! - Failed items are retried on later passes up to `max_retries`, then dropped
//! - Reconnect (offline to online) triggers a drain via [`SyncManager::watch_connectivity`]
//!
//! Delivery is best-effort: an enqueued mutation is never guaranteed to
//! reach the server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use sj_core::{ItemSummary, MutationKind, Store, SyncAction, SyncItem, SyncQueue};
use tokio_util::sync::CancellationToken;

use super::connectivity::{Connectivity, ConnectivityWatch, OfflineTracker};
use super::remote::{RemoteError, RemoteRegistry, RemoteResult};

/// Store key holding the pending queue.
pub const QUEUE_KEY: &str = "sync-queue";
/// Store key holding dropped (dead-lettered) items.
pub const DROPPED_KEY: &str = "sync-dropped";

/// Configuration for the sync manager.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Failed attempts after which an item is dropped.
    pub max_retries: u32,
    /// Upper bound on a single remote operation; expiry counts as a failure.
    pub op_timeout: Duration,
    /// Save attempts per persist before giving up.
    pub persist_attempts: u32,
    /// Keep dropped items in an inspectable list.
    pub keep_dropped: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            max_retries: 3,
            op_timeout: Duration::from_secs(30),
            persist_attempts: 3,
            keep_dropped: true,
        }
    }
}

/// Read-only snapshot for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    pub total_items: usize,
    pub is_processing: bool,
    pub items: Vec<ItemSummary>,
}

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Items handed to a remote operation.
    pub attempted: usize,
    /// Items delivered and removed.
    pub synced: usize,
    /// Failed attempts (including those that led to a drop).
    pub failed: usize,
    /// Items removed after exhausting their retries.
    pub dropped: usize,
    /// True when the pass did not run (offline, empty, or already draining).
    pub skipped: bool,
}

impl DrainReport {
    fn skipped() -> Self {
        DrainReport {
            skipped: true,
            ..Default::default()
        }
    }
}

/// Clears the processing flag when the drain pass ends, even if the drain
/// future is dropped mid-pass.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard(flag))
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// What a failed attempt did to the item.
enum Failure {
    /// Retry count bumped; the item stays queued.
    Retried,
    /// Retry bound reached; the item was removed.
    Dropped,
    /// The item left the queue while its call was in flight.
    Gone,
}

struct Inner {
    config: SyncConfig,
    store: Arc<dyn Store>,
    remotes: RemoteRegistry,
    connectivity: Arc<dyn Connectivity>,
    queue: Mutex<SyncQueue>,
    dropped: Mutex<SyncQueue>,
    processing: AtomicBool,
    /// A trigger arrived while a pass was running.
    rerun: AtomicBool,
}

/// Offline mutation queue with reconnect-triggered draining.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct SyncManager {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SyncManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncManager")
            .field("config", &self.inner.config)
            .field("remotes", &self.inner.remotes)
            .field("pending", &self.lock_queue().len())
            .field("processing", &self.is_processing())
            .finish()
    }
}

impl SyncManager {
    /// Create a manager, loading any queue previously persisted in `store`.
    ///
    /// An unreadable or corrupt queue is logged and replaced by an empty one.
    pub fn new(
        config: SyncConfig,
        store: Arc<dyn Store>,
        remotes: RemoteRegistry,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        let queue = load_queue(store.as_ref(), QUEUE_KEY);
        let dropped = load_queue(store.as_ref(), DROPPED_KEY);
        tracing::debug!(pending = queue.len(), dropped = dropped.len(), "sync queue loaded");

        SyncManager {
            inner: Arc::new(Inner {
                config,
                store,
                remotes,
                connectivity,
                queue: Mutex::new(queue),
                dropped: Mutex::new(dropped),
                processing: AtomicBool::new(false),
                rerun: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    pub fn is_online(&self) -> bool {
        self.inner.connectivity.is_online()
    }

    pub fn is_processing(&self) -> bool {
        self.inner.processing.load(Ordering::Acquire)
    }

    /// Queue a mutation for delivery.
    ///
    /// The queue is persisted before returning. When online, a drain is
    /// spawned on the current tokio runtime and not awaited.
    pub fn enqueue(&self, kind: MutationKind, action: SyncAction, payload: Value) -> SyncItem {
        let item = SyncItem::new(kind, action, payload);
        {
            let mut queue = self.lock_queue();
            queue.push(item.clone());
            self.persist(QUEUE_KEY, &queue);
        }
        tracing::debug!(id = %item.id, %kind, %action, "mutation queued");

        if self.is_online() {
            self.spawn_drain();
        }
        item
    }

    /// Start a drain without waiting for it.
    pub fn spawn_drain(&self) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let manager = self.clone();
                handle.spawn(async move {
                    manager.drain().await;
                });
            }
            Err(_) => {
                tracing::debug!("no async runtime, drain deferred to next trigger");
            }
        }
    }

    /// Attempt delivery of every item queued when the pass starts.
    ///
    /// Returns a skipped report without touching the queue when offline,
    /// when the queue is empty, or when another pass is running. Items
    /// enqueued during the pass wait for the next one, which is spawned
    /// when the pass ends if a drain was requested meanwhile.
    pub async fn drain(&self) -> DrainReport {
        if !self.is_online() {
            tracing::debug!("offline, drain skipped");
            return DrainReport::skipped();
        }
        let Some(guard) = ProcessingGuard::acquire(&self.inner.processing) else {
            tracing::debug!("drain already in progress, next pass requested");
            self.inner.rerun.store(true, Ordering::Release);
            return DrainReport::skipped();
        };
        self.inner.rerun.store(false, Ordering::Release);

        let report = self.run_pass().await;
        drop(guard);

        if self.inner.rerun.swap(false, Ordering::AcqRel)
            && self.is_online()
            && !self.lock_queue().is_empty()
        {
            tracing::debug!("drain requested during pass, starting another");
            self.spawn_drain();
        }
        report
    }

    async fn run_pass(&self) -> DrainReport {
        let snapshot: Vec<SyncItem> = self.lock_queue().items().to_vec();
        if snapshot.is_empty() {
            return DrainReport::skipped();
        }

        tracing::info!(items = snapshot.len(), "draining sync queue");
        let mut report = DrainReport::default();

        for item in snapshot {
            let still_queued = self.lock_queue().get(&item.id).is_some();
            if !still_queued {
                tracing::debug!(id = %item.id, "item left the queue mid-pass");
                continue;
            }

            report.attempted += 1;
            let result = self.deliver(&item).await;
            match result {
                Ok(()) => {
                    let mut queue = self.lock_queue();
                    queue.remove(&item.id);
                    self.persist(QUEUE_KEY, &queue);
                    report.synced += 1;
                    tracing::debug!(id = %item.id, kind = %item.kind, "synced");
                }
                Err(e) => match self.record_failure(&item, &e) {
                    Failure::Retried => report.failed += 1,
                    Failure::Dropped => {
                        report.failed += 1;
                        report.dropped += 1;
                    }
                    Failure::Gone => {
                        tracing::debug!(id = %item.id, "failed item already left the queue: {}", e);
                    }
                },
            }
        }

        {
            let queue = self.lock_queue();
            self.persist(QUEUE_KEY, &queue);
        }
        tracing::info!(
            attempted = report.attempted,
            synced = report.synced,
            failed = report.failed,
            dropped = report.dropped,
            "drain finished"
        );
        report
    }

    /// Current queue contents without payloads.
    pub fn status(&self) -> QueueStatus {
        let queue = self.lock_queue();
        QueueStatus {
            total_items: queue.len(),
            is_processing: self.is_processing(),
            items: queue.summaries(),
        }
    }

    /// Empty the queue. Intended for explicit user-initiated resets.
    pub fn clear(&self) {
        let mut queue = self.lock_queue();
        let removed = queue.len();
        queue.clear();
        self.persist(QUEUE_KEY, &queue);
        tracing::info!(removed, "sync queue cleared");
    }

    /// Items dropped after exhausting their retries, oldest first.
    pub fn dropped(&self) -> Vec<ItemSummary> {
        self.lock_dropped().summaries()
    }

    pub fn clear_dropped(&self) {
        let mut dropped = self.lock_dropped();
        dropped.clear();
        self.persist(DROPPED_KEY, &dropped);
    }

    /// Subscribe to the connectivity source and drain on every reconnect.
    ///
    /// Must be called within a tokio runtime. The subscription lasts until
    /// the returned handle is stopped or dropped.
    pub fn watch_connectivity(&self) -> ConnectivityWatch {
        let mut rx = self.inner.connectivity.subscribe();
        let initial = *rx.borrow_and_update();
        let tracker = Arc::new(Mutex::new(OfflineTracker::new(initial)));
        let cancel_token = CancellationToken::new();

        let manager = self.clone();
        let task_tracker = Arc::clone(&tracker);
        let task_token = cancel_token.clone();
        let task = tokio::spawn(async move {
            let mut was_online = initial;
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            tracing::debug!("connectivity source closed");
                            break;
                        }
                        let online = *rx.borrow_and_update();
                        {
                            let mut tracker = task_tracker
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner);
                            // An unchanged value means the opposite state was
                            // coalesced away in between.
                            if online == was_online {
                                tracker.observe(!online);
                            }
                            tracker.observe(online);
                        }
                        if online {
                            if !was_online {
                                tracing::info!("back online, draining sync queue");
                            }
                            manager.spawn_drain();
                        } else {
                            tracing::info!("offline, mutations will be queued");
                        }
                        was_online = online;
                    }
                }
            }
        });

        ConnectivityWatch::new(cancel_token, tracker, task)
    }

    async fn deliver(&self, item: &SyncItem) -> RemoteResult<()> {
        let op = self
            .inner
            .remotes
            .get(item.kind)
            .ok_or(RemoteError::NotRegistered(item.kind))?;

        let timeout = self.inner.config.op_timeout;
        match tokio::time::timeout(timeout, op.call(item.action, &item.payload)).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Timeout(
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }

    /// Bumps the retry count of a failed item, dropping it at the bound.
    fn record_failure(&self, item: &SyncItem, error: &RemoteError) -> Failure {
        let mut queue = self.lock_queue();
        let Some(retries) = queue.bump_retry(&item.id) else {
            return Failure::Gone;
        };

        if retries < self.inner.config.max_retries {
            tracing::warn!(id = %item.id, kind = %item.kind, retries, "sync failed, will retry: {}", error);
            self.persist(QUEUE_KEY, &queue);
            return Failure::Retried;
        }

        let dead = queue.remove(&item.id);
        self.persist(QUEUE_KEY, &queue);
        drop(queue);

        tracing::warn!(id = %item.id, kind = %item.kind, retries, "max retries exceeded, dropping item: {}", error);
        if let Some(dead) = dead {
            if self.inner.config.keep_dropped {
                let mut dropped = self.lock_dropped();
                dropped.push(dead);
                self.persist(DROPPED_KEY, &dropped);
            }
        }
        Failure::Dropped
    }

    /// Saves `queue` under `key`, retrying on failure. Never propagates.
    ///
    /// Called with the queue lock held so saves land in mutation order.
    fn persist(&self, key: &str, queue: &SyncQueue) {
        let bytes = match queue.encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(key, "failed to encode sync queue: {}", e);
                return;
            }
        };

        let attempts = self.inner.config.persist_attempts.max(1);
        for attempt in 1..=attempts {
            match self.inner.store.save(key, &bytes) {
                Ok(()) => return,
                Err(e) if attempt < attempts => {
                    tracing::warn!(key, attempt, "failed to save sync queue, retrying: {}", e);
                }
                Err(e) => {
                    tracing::error!(key, attempt, "failed to save sync queue: {}", e);
                }
            }
        }
    }

    fn lock_queue(&self) -> MutexGuard<'_, SyncQueue> {
        self.inner.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_dropped(&self) -> MutexGuard<'_, SyncQueue> {
        self.inner.dropped.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load_queue(store: &dyn Store, key: &str) -> SyncQueue {
    match store.load(key) {
        Ok(Some(bytes)) => SyncQueue::decode(&bytes).unwrap_or_else(|e| {
            tracing::error!(key, "failed to load sync queue: {}", e);
            SyncQueue::new()
        }),
        Ok(None) => SyncQueue::new(),
        Err(e) => {
            tracing::error!(key, "failed to load sync queue: {}", e);
            SyncQueue::new()
        }
    }
}
