// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::display::format_report;
use crate::error::Result;
use crate::sync::{Banner, OfflineTracker};

use super::{Context, DrainLock};

/// Runs one pass against the simulated remotes ("Sync now").
///
/// Fails fast when another process is already draining the same directory.
pub async fn run(ctx: &Context, offline: bool, out: &mut dyn Write) -> Result<()> {
    let _lock = DrainLock::try_acquire(&ctx.data_dir)?;
    let (manager, _) = ctx.open_manager(!offline)?;

    let report = manager.drain().await;
    let status = manager.status();

    if offline {
        let banner = Banner::derive(&OfflineTracker::new(false), &status);
        writeln!(out, "{}", banner)?;
        return Ok(());
    }

    writeln!(out, "{}", format_report(&report))?;
    if status.total_items > 0 {
        writeln!(out, "{} items still pending", status.total_items)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
