// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use sj_core::ItemSummary;

use crate::sync::{DrainReport, QueueStatus};

/// One queue entry: `[kind] action id (retries: N, queued ...)`.
pub fn format_item_line(item: &ItemSummary) -> String {
    let mut line = format!("[{}] {} {}", item.kind, item.action, item.id);
    let queued = item.enqueued_at.format("%Y-%m-%d %H:%M:%S");
    if item.retry_count > 0 {
        line.push_str(&format!(
            " (retries: {}, queued {})",
            item.retry_count, queued
        ));
    } else {
        line.push_str(&format!(" (queued {})", queued));
    }
    line
}

fn pluralize(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Multi-line queue status.
pub fn format_status(status: &QueueStatus) -> String {
    let mut out = format!("Pending: {}", pluralize(status.total_items, "item"));
    if status.is_processing {
        out.push_str(" (sync in progress)");
    }
    for item in &status.items {
        out.push_str("\n  ");
        out.push_str(&format_item_line(item));
    }
    out
}

/// One-line summary of a drain pass.
pub fn format_report(report: &DrainReport) -> String {
    if report.skipped {
        return "Nothing to sync".to_string();
    }
    let mut out = format!(
        "Synced {} of {}",
        report.synced,
        pluralize(report.attempted, "item")
    );
    if report.failed > 0 {
        out.push_str(&format!(", {} failed", report.failed));
    }
    if report.dropped > 0 {
        out.push_str(&format!(", {} dropped", report.dropped));
    }
    out
}

/// Dead-letter listing.
pub fn format_dropped(items: &[ItemSummary]) -> String {
    if items.is_empty() {
        return "No dropped items".to_string();
    }
    let mut out = format!("Dropped: {}", pluralize(items.len(), "item"));
    for item in items {
        out.push_str("\n  ");
        out.push_str(&format_item_line(item));
    }
    out
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
