// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use serde_json::Value;
use sj_core::{MutationKind, SyncAction};

use crate::display::format_report;
use crate::error::{Error, Result};

use super::{Context, DrainLock};

/// Parses `--payload`; any JSON value is accepted.
pub fn parse_payload(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| Error::InvalidPayload(e.to_string()))
}

/// Queues one mutation and prints its id.
///
/// The manager is opened offline so nothing drains implicitly; with `sync`
/// the connection is brought up and one pass runs before returning.
pub async fn run(
    ctx: &Context,
    kind: MutationKind,
    action: SyncAction,
    payload: &str,
    sync: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let payload = parse_payload(payload)?;
    let _lock = DrainLock::wait(&ctx.data_dir)?;
    let (manager, connectivity) = ctx.open_manager(false)?;

    let item = manager.enqueue(kind, action, payload);
    writeln!(out, "{}", item.id)?;

    if sync {
        connectivity.set_online(true);
        let report = manager.drain().await;
        writeln!(out, "{}", format_report(&report))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
