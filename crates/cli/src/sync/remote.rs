// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote operations that deliver queued mutations.
//!
//! Each [`MutationKind`] is delivered by exactly one [`RemoteOp`], looked up
//! in a [`RemoteRegistry`]. Adding a kind means registering one operation;
//! the drain loop never branches on kind.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use sj_core::{MutationKind, SyncAction};

/// Error type for remote operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The remote refused the mutation (bad payload, conflict, ...).
    #[error("rejected by remote: {0}")]
    Rejected(String),

    /// The remote could not be reached.
    #[error("remote unavailable: {0}")]
    Unavailable(String),

    /// The operation did not resolve in time.
    #[error("remote operation timed out after {0}ms")]
    Timeout(u64),

    /// No operation is registered for the kind.
    #[error("no remote operation registered for '{0}'")]
    NotRegistered(MutationKind),
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`RemoteOp::call`].
pub type RemoteFuture<'a> = Pin<Box<dyn Future<Output = RemoteResult<()>> + Send + 'a>>;

/// One asynchronous delivery operation.
///
/// Implementations decide how the mutation reaches the server (REST call,
/// queue publish, ...). The payload is passed through untouched.
pub trait RemoteOp: Send + Sync {
    /// Deliver one mutation.
    fn call<'a>(&'a self, action: SyncAction, payload: &'a Value) -> RemoteFuture<'a>;
}

/// Mapping from mutation kind to the operation that delivers it.
#[derive(Clone, Default)]
pub struct RemoteRegistry {
    ops: HashMap<MutationKind, Arc<dyn RemoteOp>>,
}

impl RemoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `op` for `kind`, replacing any previous registration.
    pub fn register(&mut self, kind: MutationKind, op: Arc<dyn RemoteOp>) -> &mut Self {
        self.ops.insert(kind, op);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, kind: MutationKind, op: Arc<dyn RemoteOp>) -> Self {
        self.register(kind, op);
        self
    }

    /// Registers the same operation for every kind.
    pub fn with_all(mut self, op: Arc<dyn RemoteOp>) -> Self {
        for kind in MutationKind::ALL {
            self.register(kind, Arc::clone(&op));
        }
        self
    }

    pub fn get(&self, kind: MutationKind) -> Option<&Arc<dyn RemoteOp>> {
        self.ops.get(&kind)
    }

    pub fn contains(&self, kind: MutationKind) -> bool {
        self.ops.contains_key(&kind)
    }

    /// Registry of [`SimulatedRemote`]s for every kind.
    ///
    /// `latency_scale` multiplies the per-kind latency (0.0 disables the
    /// sleep). Kinds listed in `failing` always reject.
    pub fn simulated(latency_scale: f64, failing: &[MutationKind]) -> Self {
        let mut registry = Self::new();
        for kind in MutationKind::ALL {
            let op = SimulatedRemote::new(kind)
                .scaled(latency_scale)
                .failing(failing.contains(&kind));
            registry.register(kind, Arc::new(op));
        }
        registry
    }
}

impl std::fmt::Debug for RemoteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.ops.keys().map(MutationKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("RemoteRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

/// Network latency the simulated remote waits before answering.
pub fn simulated_latency(kind: MutationKind) -> Duration {
    match kind {
        MutationKind::Event => Duration::from_millis(1000),
        MutationKind::Photo => Duration::from_millis(2000),
        MutationKind::Report => Duration::from_millis(1500),
        MutationKind::Profile => Duration::from_millis(800),
    }
}

/// Stand-in remote that logs the mutation and sleeps to mimic the network.
#[derive(Debug, Clone)]
pub struct SimulatedRemote {
    kind: MutationKind,
    latency: Duration,
    fail: bool,
}

impl SimulatedRemote {
    pub fn new(kind: MutationKind) -> Self {
        SimulatedRemote {
            kind,
            latency: simulated_latency(kind),
            fail: false,
        }
    }

    /// Multiplies the latency; negative or non-finite scales become zero
    /// and results too large for a `Duration` saturate.
    pub fn scaled(mut self, scale: f64) -> Self {
        if !(scale.is_finite() && scale > 0.0) {
            self.latency = Duration::ZERO;
            return self;
        }
        self.latency = Duration::try_from_secs_f64(self.latency.as_secs_f64() * scale)
            .unwrap_or(Duration::MAX);
        self
    }

    /// Makes every call reject.
    pub fn failing(mut self, fail: bool) -> Self {
        self.fail = fail;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl RemoteOp for SimulatedRemote {
    fn call<'a>(&'a self, action: SyncAction, payload: &'a Value) -> RemoteFuture<'a> {
        Box::pin(async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            let entity = payload.get("id").and_then(Value::as_str).unwrap_or("-");
            if self.fail {
                tracing::debug!(kind = %self.kind, %action, entity, "simulated remote rejecting");
                return Err(RemoteError::Unavailable(format!(
                    "simulated {} endpoint is down",
                    self.kind
                )));
            }
            tracing::info!(kind = %self.kind, %action, entity, "syncing {} {}", self.kind, action);
            Ok(())
        })
    }
}
