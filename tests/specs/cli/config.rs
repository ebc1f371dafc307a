// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for configuration loading and `tandem config`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::*;

#[test]
fn config_show_prints_effective_settings() {
    let ws = Workspace::offline();
    ws.tandem()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# store: "))
        .stdout(predicate::str::contains("max_attempts = 3"))
        .stdout(predicate::str::contains("[remote]"));
}

#[test]
fn config_show_masks_token_from_env() {
    let ws = Workspace::offline();
    ws.tandem()
        .env("TANDEM_AUTH_TOKEN", "s3cret")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cret").not());
}

#[test]
fn explicit_missing_config_fails() {
    let ws = Workspace::offline();
    ws.tandem()
        .args(["--config", "/nonexistent/tandem.toml", "pending"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"));
}

#[test]
fn invalid_config_rejected() {
    let ws = Workspace::offline();
    std::fs::write(ws.config_path(), "[queue]\nmax_attempts = 0\n").unwrap();

    ws.tandem()
        .arg("pending")
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_attempts must be at least 1"));
}

#[test]
fn data_dir_env_overrides_config() {
    let ws = Workspace::offline();
    let other = TempDir::new().unwrap();

    ws.tandem()
        .env("TANDEM_DATA_DIR", other.path())
        .args(["enqueue", "update_progress", "{}"])
        .assert()
        .success();

    assert!(other.path().join("store.db").exists());
    assert!(!ws.store_path().exists());
}
