// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `tandem status`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::*;

#[test]
fn status_offline_with_pending() {
    let ws = Workspace::offline();
    ws.enqueue("complete_step", r#"{"lessonId": "1", "step": 2}"#);
    ws.enqueue("complete_step", r#"{"lessonId": "1", "step": 3}"#);

    ws.tandem()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("(offline)"))
        .stdout(predicate::str::contains("2 pending changes — will sync when online"));
}

#[test]
fn status_online_when_remote_listens() {
    let (base_url, _requests) = stub_remote(200);
    let ws = Workspace::with_remote(&base_url);

    let output = ws.tandem().args(["status", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["connectivity"], "online");
    assert_eq!(json["pending"], 0);
    assert_eq!(json["summary"], "All changes synced");
}
