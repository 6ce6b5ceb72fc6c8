// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use super::*;
use clap::CommandFactory;
use yare::parameterized;

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_enqueue_parses_kind_and_action() {
    let cli = Cli::try_parse_from([
        "sjsync",
        "enqueue",
        "photo",
        "update",
        "--payload",
        r#"{"id":"p1"}"#,
        "--sync",
    ])
    .unwrap();
    match cli.command {
        Command::Enqueue {
            kind,
            action,
            payload,
            sync,
        } => {
            assert_eq!(kind, MutationKind::Photo);
            assert_eq!(action, SyncAction::Update);
            assert_eq!(payload, r#"{"id":"p1"}"#);
            assert!(sync);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_enqueue_payload_defaults_to_empty_object() {
    let cli = Cli::try_parse_from(["sjsync", "enqueue", "event", "create"]).unwrap();
    match cli.command {
        Command::Enqueue { payload, sync, .. } => {
            assert_eq!(payload, "{}");
            assert!(!sync);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[parameterized(
    unknown_kind = { &["sjsync", "enqueue", "comment", "create"] },
    unknown_action = { &["sjsync", "enqueue", "event", "upsert"] },
    missing_action = { &["sjsync", "enqueue", "event"] },
    bad_format = { &["sjsync", "status", "-o", "yaml"] },
)]
fn test_rejected_arguments(args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["sjsync", "status", "-C", "/tmp/data", "-v"]).unwrap();
    assert_eq!(cli.directory, Some(PathBuf::from("/tmp/data")));
    assert!(cli.verbose);
}

#[parameterized(
    text = { "text", OutputFormat::Text },
    json = { "json", OutputFormat::Json },
)]
fn test_output_format(value: &str, expected: OutputFormat) {
    let cli = Cli::try_parse_from(["sjsync", "dropped", "-o", value]).unwrap();
    match cli.command {
        Command::Dropped { output } => assert_eq!(output, expected),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_drain_and_clear_flags() {
    let cli = Cli::try_parse_from(["sjsync", "drain", "--offline"]).unwrap();
    assert!(matches!(cli.command, Command::Drain { offline: true }));

    let cli = Cli::try_parse_from(["sjsync", "clear", "--dropped"]).unwrap();
    assert!(matches!(cli.command, Command::Clear { dropped: true }));
}
