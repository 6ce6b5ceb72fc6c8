// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::error::Result;

use super::{Context, DrainLock};

/// Empties the queue, or the dropped list with `dropped`.
pub fn run(ctx: &Context, dropped: bool, out: &mut dyn Write) -> Result<()> {
    let _lock = DrainLock::wait(&ctx.data_dir)?;
    let (manager, _) = ctx.open_manager(false)?;

    if dropped {
        let removed = manager.dropped().len();
        manager.clear_dropped();
        writeln!(out, "Cleared {} dropped items", removed)?;
    } else {
        let removed = manager.status().total_items;
        manager.clear();
        writeln!(out, "Cleared {} pending items", removed)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
