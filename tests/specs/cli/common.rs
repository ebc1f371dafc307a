// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// A temp workspace with its own config file and store.
pub struct Workspace {
    pub temp: TempDir,
}

impl Workspace {
    /// Workspace whose remote points at `base_url`.
    pub fn with_remote(base_url: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let config = format!(
            "data_dir = \"{}\"\n\n[remote]\nbase_url = \"{}\"\ntimeout_secs = 2\n\n[probe]\ntimeout_ms = 200\n",
            temp.path().join("data").display(),
            base_url
        );
        std::fs::write(temp.path().join("config.toml"), config).unwrap();
        Workspace { temp }
    }

    /// Workspace whose remote refuses connections.
    pub fn offline() -> Self {
        Self::with_remote(&format!("http://{}/api/v1/", closed_address()))
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp.path().join("config.toml")
    }

    pub fn store_path(&self) -> PathBuf {
        self.temp.path().join("data").join("store.db")
    }

    /// `tandem` bound to this workspace's config.
    pub fn tandem(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("tandem");
        cmd.env("TANDEM_CONFIG", self.config_path())
            .env_remove("TANDEM_DATA_DIR")
            .env_remove("TANDEM_AUTH_TOKEN")
            .env_remove("TANDEM_LOG");
        cmd
    }

    /// Enqueues an action and returns its id.
    pub fn enqueue(&self, kind: &str, payload: &str) -> String {
        let output = self.tandem().args(["enqueue", kind, payload]).output().unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Pending actions as JSON.
    pub fn pending_json(&self) -> Vec<serde_json::Value> {
        let output = self.tandem().args(["pending", "-o", "json"]).output().unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

/// An address nothing listens on.
pub fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

/// Minimal HTTP server answering every request with `status`.
///
/// Returns the base URL and the raw requests received.
pub fn stub_remote(status: u16) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&requests);

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let request = read_request(&mut stream);
            if request.is_empty() {
                continue;
            }
            captured.lock().unwrap().push(request);
            let response =
                format!("HTTP/1.1 {status} Stub\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            let _ = stream.write_all(response.as_bytes());
        }
    });

    (format!("http://{addr}/api/v1/"), requests)
}

fn read_request(stream: &mut std::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
