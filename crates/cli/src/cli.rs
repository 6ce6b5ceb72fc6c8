// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sj_core::{MutationKind, SyncAction};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "sjsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline sync queue: buffer mutations locally and deliver them when online")]
pub struct Cli {
    /// Use <path> as the data directory
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Queue a mutation for later delivery
    #[command(after_help = "\
Examples:
  sjsync enqueue event create --payload '{\"id\":\"e1\"}'
  sjsync enqueue photo delete --sync")]
    Enqueue {
        /// Mutation kind (event, photo, report, profile)
        kind: MutationKind,

        /// Action (create, update, delete)
        action: SyncAction,

        /// JSON payload delivered as-is
        #[arg(long, default_value = "{}")]
        payload: String,

        /// Drain the queue right after enqueueing
        #[arg(long)]
        sync: bool,
    },

    /// Show pending items
    Status {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Run one sync pass now
    Drain {
        /// Treat the connection as down (the pass is skipped)
        #[arg(long)]
        offline: bool,
    },

    /// Remove every pending item
    Clear {
        /// Clear the dropped-items list instead
        #[arg(long)]
        dropped: bool,
    },

    /// List items dropped after exhausting their retries
    Dropped {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
