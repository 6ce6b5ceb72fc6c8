// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync item types.
//!
//! A [`SyncItem`] is one buffered local mutation awaiting delivery. The
//! [`MutationKind`] selects which remote operation delivers it; the payload
//! is opaque to the queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

/// Category of entity a sync item affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    /// Community event (clean-up drive, plantation, ...).
    Event,
    /// Uploaded photo.
    Photo,
    /// Pollution or wildlife report.
    Report,
    /// User profile.
    Profile,
}

impl MutationKind {
    /// Every kind, in declaration order.
    pub const ALL: [MutationKind; 4] = [
        MutationKind::Event,
        MutationKind::Photo,
        MutationKind::Report,
        MutationKind::Profile,
    ];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Event => "event",
            MutationKind::Photo => "photo",
            MutationKind::Report => "report",
            MutationKind::Profile => "profile",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MutationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "event" => Ok(MutationKind::Event),
            "photo" => Ok(MutationKind::Photo),
            "report" => Ok(MutationKind::Report),
            "profile" => Ok(MutationKind::Profile),
            _ => Err(Error::InvalidKind(s.to_string())),
        }
    }
}

/// The write a sync item carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Create,
    Update,
    Delete,
}

impl SyncAction {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Create => "create",
            SyncAction::Update => "update",
            SyncAction::Delete => "delete",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "create" => Ok(SyncAction::Create),
            "update" => Ok(SyncAction::Update),
            "delete" => Ok(SyncAction::Delete),
            _ => Err(Error::InvalidAction(s.to_string())),
        }
    }
}

/// Process-local sequence mixed into generated IDs so two items enqueued in
/// the same nanosecond still differ.
static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Unique identifier of a sync item.
///
/// Format: `{wall_ms}-{hash}` where hash is the first 8 hex chars of
/// SHA256(nanos + sequence + kind).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generates a fresh ID for an item of `kind` enqueued at `at`.
    pub fn generate(kind: MutationKind, at: &DateTime<Utc>) -> Self {
        let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let nanos = at.timestamp_nanos_opt().unwrap_or_default();
        let input = format!("{}{}{}", nanos, seq, kind.as_str());
        let hash = Sha256::digest(input.as_bytes());
        ItemId(format!("{}-{}", at.timestamp_millis(), hex::encode(&hash[..4])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One pending mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncItem {
    pub id: ItemId,
    pub kind: MutationKind,
    pub action: SyncAction,
    /// Kind-specific data; never inspected by the queue.
    pub payload: serde_json::Value,
    /// Informational only. Ordering is by queue position.
    pub enqueued_at: DateTime<Utc>,
    /// Failed delivery attempts so far.
    #[serde(default)]
    pub retry_count: u32,
}

impl SyncItem {
    /// Creates a new item stamped with the current time and a fresh ID.
    pub fn new(kind: MutationKind, action: SyncAction, payload: serde_json::Value) -> Self {
        Self::new_at(kind, action, payload, Utc::now())
    }

    /// Creates a new item stamped with the given time.
    pub fn new_at(
        kind: MutationKind,
        action: SyncAction,
        payload: serde_json::Value,
        enqueued_at: DateTime<Utc>,
    ) -> Self {
        SyncItem {
            id: ItemId::generate(kind, &enqueued_at),
            kind,
            action,
            payload,
            enqueued_at,
            retry_count: 0,
        }
    }

    /// Returns the payload-free summary shown to observers.
    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id.clone(),
            kind: self.kind,
            action: self.action,
            enqueued_at: self.enqueued_at,
            retry_count: self.retry_count,
        }
    }
}

/// Lightweight view of a [`SyncItem`] without its payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemSummary {
    pub id: ItemId,
    pub kind: MutationKind,
    pub action: SyncAction,
    pub enqueued_at: DateTime<Utc>,
    pub retry_count: u32,
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
