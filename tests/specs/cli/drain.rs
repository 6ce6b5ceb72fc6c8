// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `sjsync drain` and `enqueue --sync`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sjsync(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("sjsync");
    cmd.arg("-C").arg(dir.path()).env_remove("RUST_LOG");
    cmd
}

/// Data directory with instant remotes; `fail_kinds` always fail.
fn data_dir(fail_kinds: &[&str]) -> TempDir {
    let temp = TempDir::new().unwrap();
    let kinds: Vec<String> = fail_kinds.iter().map(|k| format!("\"{}\"", k)).collect();
    std::fs::write(
        temp.path().join("config.toml"),
        format!(
            "[remote]\nlatency_scale = 0.0\nfail_kinds = [{}]\n",
            kinds.join(", ")
        ),
    )
    .unwrap();
    temp
}

fn enqueue(dir: &TempDir, kind: &str) {
    sjsync(dir)
        .args(["enqueue", kind, "create"])
        .assert()
        .success();
}

fn pending(dir: &TempDir) -> u64 {
    let output = sjsync(dir).args(["status", "-o", "json"]).output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value["sync_queue"]["total_items"].as_u64().unwrap()
}

#[test]
fn drain_delivers_all_items() {
    let temp = data_dir(&[]);
    enqueue(&temp, "event");
    enqueue(&temp, "photo");
    enqueue(&temp, "profile");

    sjsync(&temp)
        .arg("drain")
        .assert()
        .success()
        .stdout("Synced 3 of 3 items\n");
    assert_eq!(pending(&temp), 0);
}

#[test]
fn drain_with_nothing_queued() {
    let temp = data_dir(&[]);
    sjsync(&temp)
        .arg("drain")
        .assert()
        .success()
        .stdout("Nothing to sync\n");
}

#[test]
fn drain_offline_leaves_queue_untouched() {
    let temp = data_dir(&[]);
    enqueue(&temp, "report");

    sjsync(&temp)
        .args(["drain", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("You're offline."))
        .stdout(predicate::str::contains("(1 items waiting to sync)"));
    assert_eq!(pending(&temp), 1);
}

#[test]
fn failing_item_does_not_block_others() {
    let temp = data_dir(&["photo"]);
    enqueue(&temp, "photo");
    enqueue(&temp, "event");

    sjsync(&temp)
        .arg("drain")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 1 of 2 items, 1 failed"))
        .stdout(predicate::str::contains("1 items still pending"));
    assert_eq!(pending(&temp), 1);
}

#[test]
fn item_is_dropped_after_three_failed_passes() {
    let temp = data_dir(&["photo"]);
    enqueue(&temp, "photo");

    for _ in 0..2 {
        sjsync(&temp).arg("drain").assert().success();
        assert_eq!(pending(&temp), 1);
    }
    sjsync(&temp)
        .arg("drain")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 dropped"));
    assert_eq!(pending(&temp), 0);

    let output = sjsync(&temp).args(["dropped", "-o", "json"]).output().unwrap();
    let dropped: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(dropped[0]["kind"], "photo");
    assert_eq!(dropped[0]["retry_count"], 3);

    sjsync(&temp)
        .args(["clear", "--dropped"])
        .assert()
        .success()
        .stdout("Cleared 1 dropped items\n");
}

#[test]
fn enqueue_with_sync_drains_immediately() {
    let temp = data_dir(&[]);
    sjsync(&temp)
        .args(["enqueue", "event", "create", "--sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 1 of 1 item"));
    assert_eq!(pending(&temp), 0);
}
