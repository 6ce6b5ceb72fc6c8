// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use sj_core::{MemoryStore, Store, SyncAction};
use tokio::sync::Semaphore;

use super::connectivity::{Connectivity, ManualConnectivity};
use super::manager::{SyncConfig, SyncManager};
use super::remote::{RemoteError, RemoteFuture, RemoteOp, RemoteRegistry};

/// Mock remote operation recording every call.
///
/// Calls are recorded on entry (before any gate), so tests can observe that
/// a call is in flight while it is still blocked.
#[derive(Clone, Default)]
pub struct MockRemote {
    calls: Arc<Mutex<Vec<String>>>,
    fail: Arc<AtomicBool>,
    gate: Option<Arc<Semaphore>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose calls block until [`release`](Self::release).
    pub fn gated() -> Self {
        MockRemote {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    /// Unblocks exactly one gated call.
    pub fn release_one(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Unblocks every gated call from here on.
    pub fn open(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1024);
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::Release);
    }

    /// The `id` field of every payload delivered so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl RemoteOp for MockRemote {
    fn call<'a>(&'a self, _action: SyncAction, payload: &'a Value) -> RemoteFuture<'a> {
        Box::pin(async move {
            let id = payload
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or("?")
                .to_string();
            self.calls.lock().unwrap().push(id);

            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            if self.fail.load(Ordering::Acquire) {
                Err(RemoteError::Unavailable("mock failure".into()))
            } else {
                Ok(())
            }
        })
    }
}

/// Everything a manager test needs to poke at.
pub struct Harness {
    pub manager: SyncManager,
    pub remote: MockRemote,
    pub connectivity: Arc<ManualConnectivity>,
    pub store: Arc<MemoryStore>,
}

/// Manager backed by a memory store, with `remote` registered for every kind.
pub fn harness(remote: MockRemote, online: bool) -> Harness {
    harness_with(remote, online, SyncConfig::default(), Arc::new(MemoryStore::new()))
}

pub fn harness_with(
    remote: MockRemote,
    online: bool,
    config: SyncConfig,
    store: Arc<MemoryStore>,
) -> Harness {
    let connectivity = Arc::new(ManualConnectivity::new(online));
    let registry = RemoteRegistry::new().with_all(Arc::new(remote.clone()));
    let manager = SyncManager::new(
        config,
        Arc::clone(&store) as Arc<dyn Store>,
        registry,
        Arc::clone(&connectivity) as Arc<dyn Connectivity>,
    );
    Harness {
        manager,
        remote,
        connectivity,
        store,
    }
}

/// Payload carrying an `id` the mock records.
pub fn payload(id: &str) -> Value {
    json!({ "id": id })
}

/// Yield to other tasks until `cond` holds or the attempts run out.
pub async fn wait_until<F: Fn() -> bool>(cond: F) -> bool {
    for _ in 0..200 {
        if cond() {
            return true;
        }
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    cond()
}
