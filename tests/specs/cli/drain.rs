// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `tandem drain`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::*;

#[test]
fn drain_with_nothing_queued() {
    let ws = Workspace::offline();
    ws.tandem()
        .arg("drain")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to sync."));
}

#[test]
fn drain_delivers_to_remote() {
    let (base_url, requests) = stub_remote(201);
    let ws = Workspace::with_remote(&base_url);
    let id = ws.enqueue("complete_step", r#"{"lessonId": "1", "step": 2}"#);

    ws.tandem()
        .arg("drain")
        .assert()
        .success()
        .stdout(predicate::str::contains("Delivered 1 of 1 action"));

    assert!(ws.pending_json().is_empty());
    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("POST /api/v1/steps/complete "));
    assert!(requests[0].to_lowercase().contains(&format!("idempotency-key: {id}")));
}

#[test]
fn drain_against_unreachable_remote_retains_actions() {
    let ws = Workspace::offline();
    ws.enqueue("update_progress", r#"{"percent": 10}"#);

    ws.tandem()
        .args(["drain", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"retained\": 1"));

    let pending = ws.pending_json();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["attempts"], 1);
    assert!(pending[0]["last_error"].as_str().unwrap().contains("network error"));
}

#[test]
fn drain_drops_after_three_failures() {
    let (base_url, _requests) = stub_remote(503);
    let ws = Workspace::with_remote(&base_url);
    ws.enqueue("update_progress", r#"{"percent": 10}"#);

    for _ in 0..3 {
        ws.tandem().arg("drain").assert().success();
    }

    assert!(ws.pending_json().is_empty());
    ws.tandem()
        .args(["pending", "--dropped"])
        .assert()
        .success()
        .stdout(predicate::str::contains("retries_exhausted after 3 attempts"));
}
