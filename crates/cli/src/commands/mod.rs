// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod cache;
pub mod config;
pub mod drain;
pub mod enqueue;
pub mod pending;
pub mod status;
pub mod watch;

use std::sync::Arc;

use serde_json::Value;
use td_core::SqliteStore;
use td_sync::{ConnectivityState, HttpExecutor, ManualObserver, NetworkObserver, OfflineSync};

use crate::config::Config;
use crate::error::{Error, Result};

/// Sync service as wired by the CLI.
pub type CliSync<O> = OfflineSync<SqliteStore, O, HttpExecutor>;

/// Opens the configured store and builds the service around it.
pub fn open_sync<O: NetworkObserver + 'static>(config: &Config, observer: Arc<O>) -> Result<CliSync<O>> {
    let path = config.store_path()?;
    let store = SqliteStore::open(&path)?;
    tracing::debug!(path = %path.display(), "opened store");
    let executor = HttpExecutor::new(config.executor_config())?;
    Ok(OfflineSync::new(Arc::new(store), observer, executor, config.sync_config()))
}

/// Service for commands that never touch the network.
pub fn open_local(config: &Config) -> Result<CliSync<ManualObserver>> {
    open_sync(config, Arc::new(ManualObserver::new(ConnectivityState::Offline)))
}

/// Single-threaded runtime for the async commands.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread().enable_all().build()?)
}

/// Parses a payload argument, which must be a JSON object.
pub fn parse_object(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidPayload(e.to_string()))?;
    if !value.is_object() {
        return Err(Error::InvalidPayload(format!("expected an object, got {}", json_type(&value))));
    }
    Ok(value)
}

/// Parses any JSON value.
pub fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| Error::InvalidPayload(e.to_string()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
