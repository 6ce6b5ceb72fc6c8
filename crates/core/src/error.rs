// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for sj-core operations.

use thiserror::Error;

/// All possible errors that can occur in sj-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid mutation kind: '{0}'\n  hint: valid kinds are: event, photo, report, profile")]
    InvalidKind(String),

    #[error("invalid action: '{0}'\n  hint: valid actions are: create, update, delete")]
    InvalidAction(String),

    #[error("invalid store key: '{0}'\n  hint: keys may contain only letters, digits, '-' and '_'")]
    InvalidKey(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted queue: {0}")]
    CorruptedQueue(String),
}

/// A specialized Result type for sj-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
