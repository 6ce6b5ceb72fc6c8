// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered collection of pending sync items.
//!
//! The queue is persisted as a whole: [`SyncQueue::encode`] produces a JSON
//! array that [`SyncQueue::decode`] reads back. Insertion order is the
//! delivery order and is never changed by retries.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::item::{ItemId, ItemSummary, SyncItem};

/// FIFO list of [`SyncItem`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncQueue {
    items: Vec<SyncItem>,
}

impl SyncQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item at the tail.
    pub fn push(&mut self, item: SyncItem) {
        self.items.push(item);
    }

    /// Removes the item with the given id, wherever it sits.
    pub fn remove(&mut self, id: &ItemId) -> Option<SyncItem> {
        let pos = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Increments the retry count of the item with the given id.
    ///
    /// Returns the new count, or `None` if the item is no longer queued.
    pub fn bump_retry(&mut self, id: &ItemId) -> Option<u32> {
        let item = self.items.iter_mut().find(|item| &item.id == id)?;
        item.retry_count = item.retry_count.saturating_add(1);
        Some(item.retry_count)
    }

    pub fn get(&self, id: &ItemId) -> Option<&SyncItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn items(&self) -> &[SyncItem] {
        &self.items
    }

    pub fn summaries(&self) -> Vec<ItemSummary> {
        self.items.iter().map(SyncItem::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Serializes the whole queue.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.items)?)
    }

    /// Deserializes a queue written by [`SyncQueue::encode`].
    ///
    /// An empty (or whitespace-only) blob decodes to an empty queue.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }
        let items: Vec<SyncItem> = serde_json::from_slice(bytes)
            .map_err(|e| Error::CorruptedQueue(e.to_string()))?;
        Ok(SyncQueue { items })
    }
}

impl FromIterator<SyncItem> for SyncQueue {
    fn from_iter<I: IntoIterator<Item = SyncItem>>(iter: I) -> Self {
        SyncQueue {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
