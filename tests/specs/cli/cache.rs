// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `tandem cache`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::*;

#[test]
fn cache_put_then_get() {
    let ws = Workspace::offline();
    ws.tandem()
        .args(["cache", "put", "lesson:salsa-1", r#"{"title": "Basic step"}"#])
        .assert()
        .success();

    ws.tandem()
        .args(["cache", "get", "lesson:salsa-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Basic step\""));
}

#[test]
fn cache_get_missing_fails() {
    let ws = Workspace::offline();
    ws.tandem()
        .args(["cache", "get", "lesson:none"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no cached entry for 'lesson:none'"));
}

#[test]
fn cache_entry_expires() {
    let ws = Workspace::offline();
    ws.tandem().args(["cache", "put", "k", "1", "--ttl", "1"]).assert().success();

    std::thread::sleep(std::time::Duration::from_millis(1100));

    ws.tandem().args(["cache", "get", "k"]).assert().failure();
}

#[test]
fn cache_clear_keeps_queue() {
    let ws = Workspace::offline();
    ws.tandem().args(["cache", "put", "a", "1"]).assert().success();
    ws.tandem().args(["cache", "put", "b", "2"]).assert().success();
    ws.enqueue("update_progress", "{}");

    ws.tandem()
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 cache entries"));

    assert_eq!(ws.pending_json().len(), 1);
}

#[test]
fn cache_put_zero_ttl_fails() {
    let ws = Workspace::offline();
    ws.tandem()
        .args(["cache", "put", "k", "1", "--ttl", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ttl"));
}
