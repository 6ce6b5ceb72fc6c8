// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline notice derived from connectivity and queue state.

use std::fmt;

use serde::Serialize;

use super::connectivity::OfflineTracker;
use super::manager::QueueStatus;

/// What the offline/reconnect notice should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "banner", rename_all = "snake_case")]
pub enum Banner {
    /// No notice.
    Hidden,
    /// Currently offline; new mutations are being queued.
    Offline { pending: usize },
    /// Reconnected after an offline period with work still queued.
    BackOnline { pending: usize, syncing: bool },
}

impl Banner {
    pub fn derive(tracker: &OfflineTracker, status: &QueueStatus) -> Self {
        if !tracker.is_online {
            return Banner::Offline {
                pending: status.total_items,
            };
        }
        if tracker.was_offline && status.total_items > 0 {
            return Banner::BackOnline {
                pending: status.total_items,
                syncing: status.is_processing,
            };
        }
        Banner::Hidden
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, Banner::Hidden)
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Banner::Hidden => Ok(()),
            Banner::Offline { pending } => {
                write!(
                    f,
                    "You're offline. Your data will be saved locally and synced when you reconnect."
                )?;
                if *pending > 0 {
                    write!(f, " ({} items waiting to sync)", pending)?;
                }
                Ok(())
            }
            Banner::BackOnline { pending, syncing } => {
                if *syncing {
                    write!(f, "Back online! Syncing {} items...", pending)
                } else {
                    write!(f, "Back online! {} items ready to sync.", pending)
                }
            }
        }
    }
}
