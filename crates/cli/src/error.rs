// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the sjsync library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] sj_core::Error),

    #[error("invalid payload: {0}\n  hint: --payload must be a JSON value, e.g. '{{\"id\":\"e1\"}}'")]
    InvalidPayload(String),

    #[error("drain already in progress (lock held on {0})\n  hint: wait for the running 'sjsync drain' to finish")]
    DrainInProgress(String),

    #[error("no data directory: {0}\n  hint: pass -C <path> or set SJSYNC_DIR")]
    NoDataDir(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for sjsync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
