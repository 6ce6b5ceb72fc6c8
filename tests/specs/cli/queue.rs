// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `sjsync enqueue`, `status`, `clear` and `dropped`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use yare::parameterized;

fn sjsync(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("sjsync");
    cmd.arg("-C").arg(dir.path()).env_remove("RUST_LOG");
    cmd
}

/// Data directory whose simulated remotes answer instantly.
fn data_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("config.toml"),
        "[remote]\nlatency_scale = 0.0\n",
    )
    .unwrap();
    temp
}

fn enqueue(dir: &TempDir, kind: &str, action: &str, payload: &str) -> String {
    let output = sjsync(dir)
        .args(["enqueue", kind, action, "--payload", payload])
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn status_json(dir: &TempDir) -> serde_json::Value {
    let output = sjsync(dir)
        .args(["status", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn enqueue_prints_id_and_persists() {
    let temp = data_dir();
    let id = enqueue(&temp, "event", "create", r#"{"id":"e1"}"#);

    let (millis, suffix) = id.split_once('-').unwrap();
    assert!(millis.parse::<u64>().is_ok());
    assert_eq!(suffix.len(), 8);
    assert!(temp.path().join("sync-queue.json").exists());

    let raw = std::fs::read_to_string(temp.path().join("sync-queue.json")).unwrap();
    let items: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(items[0]["id"], id.as_str());
    assert_eq!(items[0]["payload"]["id"], "e1");
    assert_eq!(items[0]["retry_count"], 0);
}

#[test]
fn status_preserves_enqueue_order() {
    let temp = data_dir();
    let first = enqueue(&temp, "photo", "create", "{}");
    let second = enqueue(&temp, "event", "update", "{}");
    let third = enqueue(&temp, "profile", "delete", "{}");

    let status = status_json(&temp);
    let ids: Vec<&str> = status["sync_queue"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    similar_asserts::assert_eq!(ids, vec![first.as_str(), second.as_str(), third.as_str()]);
    assert_eq!(status["sync_queue"]["total_items"], 3);
    assert!(status["timestamp"].is_string());
}

#[test]
fn status_text_on_empty_directory() {
    let temp = data_dir();
    sjsync(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout("Pending: 0 items\n");
}

#[parameterized(
    unknown_kind = { &["enqueue", "comment", "create"], "invalid value 'comment'" },
    unknown_action = { &["enqueue", "event", "upsert"], "invalid value 'upsert'" },
)]
fn enqueue_rejects_unknown_values(args: &[&str], message: &str) {
    let temp = data_dir();
    sjsync(&temp)
        .args(args)
        .assert()
        .failure()
        .stderr(predicate::str::contains(message));
}

#[test]
fn enqueue_rejects_invalid_payload() {
    let temp = data_dir();
    sjsync(&temp)
        .args(["enqueue", "event", "create", "--payload", "{not json"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error: invalid payload"))
        .stderr(predicate::str::contains("hint:"));
    assert!(!temp.path().join("sync-queue.json").exists());
}

#[test]
fn clear_empties_the_queue() {
    let temp = data_dir();
    enqueue(&temp, "report", "create", "{}");
    enqueue(&temp, "report", "update", "{}");

    sjsync(&temp)
        .arg("clear")
        .assert()
        .success()
        .stdout("Cleared 2 pending items\n");
    assert_eq!(status_json(&temp)["sync_queue"]["total_items"], 0);
}

#[test]
fn dropped_is_empty_by_default() {
    let temp = data_dir();
    sjsync(&temp)
        .arg("dropped")
        .assert()
        .success()
        .stdout("No dropped items\n");
    sjsync(&temp)
        .args(["dropped", "-o", "json"])
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "[queue\n").unwrap();
    sjsync(&temp)
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse config"));
}

#[parameterized(
    huge_latency_scale = { "[remote]\nlatency_scale = 1e300\n", "latency_scale" },
    zero_timeout = { "[queue]\nop_timeout_ms = 0\n", "op_timeout_ms" },
)]
fn out_of_range_config_is_reported(content: &str, field: &str) {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), content).unwrap();
    sjsync(&temp)
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error: config error"))
        .stderr(predicate::str::contains(field));
}
