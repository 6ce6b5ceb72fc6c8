// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::display::format_status;
use crate::error::Result;
use crate::sync::QueueStatus;

use super::Context;

/// Point-in-time export of the queue.
#[derive(Debug, Serialize)]
pub struct StatusExport {
    pub timestamp: String,
    pub sync_queue: QueueStatus,
}

impl StatusExport {
    pub fn new(at: DateTime<Utc>, sync_queue: QueueStatus) -> Self {
        StatusExport {
            timestamp: at.to_rfc3339(),
            sync_queue,
        }
    }
}

pub fn run(ctx: &Context, output: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let (manager, _) = ctx.open_manager(false)?;
    let status = manager.status();

    match output {
        OutputFormat::Text => writeln!(out, "{}", format_status(&status))?,
        OutputFormat::Json => {
            let export = StatusExport::new(Utc::now(), status);
            writeln!(out, "{}", serde_json::to_string_pretty(&export)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
