// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::cli::OutputFormat;
use crate::display::format_dropped;
use crate::error::Result;

use super::Context;

pub fn run(ctx: &Context, output: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let (manager, _) = ctx.open_manager(false)?;
    let items = manager.dropped();

    match output {
        OutputFormat::Text => writeln!(out, "{}", format_dropped(&items))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "dropped_tests.rs"]
mod tests;
