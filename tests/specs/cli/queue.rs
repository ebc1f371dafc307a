// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `tandem enqueue` and `tandem pending`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::*;

#[test]
fn pending_empty_store() {
    let ws = Workspace::offline();
    ws.tandem()
        .arg("pending")
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending actions."));
}

#[test]
fn enqueue_prints_id_and_lists_in_order() {
    let ws = Workspace::offline();
    let first = ws.enqueue("complete_step", r#"{"lessonId": "1", "step": 2}"#);
    let second = ws.enqueue("update_progress", r#"{"lessonId": "1", "percent": 40}"#);

    assert!(!first.is_empty());
    let pending = ws.pending_json();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0]["id"], first.as_str());
    assert_eq!(pending[0]["kind"], "complete_step");
    assert_eq!(pending[0]["payload"]["step"], 2);
    assert_eq!(pending[0]["attempts"], 0);
    assert_eq!(pending[1]["id"], second.as_str());
}

#[test]
fn pending_text_shows_kind_and_payload() {
    let ws = Workspace::offline();
    ws.enqueue("record-pronunciation-score", r#"{"score": 88}"#);

    ws.tandem()
        .arg("pending")
        .assert()
        .success()
        .stdout(predicate::str::contains("record_pronunciation_score"))
        .stdout(predicate::str::contains(r#"{"score":88}"#))
        .stdout(predicate::str::contains("attempts=0"));
}

#[test]
fn enqueue_unknown_kind_fails_with_hint() {
    let ws = Workspace::offline();
    ws.tandem()
        .args(["enqueue", "finish_lesson", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid action kind"))
        .stderr(predicate::str::contains("hint: valid kinds are"));
}

#[test]
fn enqueue_non_object_payload_fails() {
    let ws = Workspace::offline();
    ws.tandem()
        .args(["enqueue", "complete_step", "[1, 2]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid payload"));
    assert!(ws.pending_json().is_empty());
}

#[test]
fn pending_dropped_empty() {
    let ws = Workspace::offline();
    ws.tandem()
        .args(["pending", "--dropped"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No dropped actions."));
}
