// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use serde_json::Value;
use td_core::{CacheLookup, PersistentStore};
use td_sync::{NetworkObserver, OfflineSync, RemoteActionExecutor};

use crate::cli::CacheCommand;
use crate::config::Config;
use crate::error::{Error, Result};

use super::{open_local, parse_json};

pub fn run(config: &Config, cmd: CacheCommand) -> Result<()> {
    let sync = open_local(config)?;
    match cmd {
        CacheCommand::Get { key } => {
            let value = get(&sync, &key)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        CacheCommand::Put { key, payload, ttl } => {
            let ttl = ttl.map(Duration::from_secs).unwrap_or_else(|| config.default_ttl());
            put(&sync, &key, &payload, ttl)?;
        }
        CacheCommand::Clear => {
            let removed = sync.cache_clear()?;
            println!("Removed {} cache entr{}", removed, if removed == 1 { "y" } else { "ies" });
        }
    }
    Ok(())
}

pub fn get<S, O, E>(sync: &OfflineSync<S, O, E>, key: &str) -> Result<Value>
where
    S: PersistentStore + 'static,
    O: NetworkObserver + 'static,
    E: RemoteActionExecutor + 'static,
{
    match sync.cache_get::<Value>(key) {
        CacheLookup::Hit(value) => Ok(value),
        CacheLookup::Miss => Err(Error::NotCached(key.to_string())),
    }
}

pub fn put<S, O, E>(sync: &OfflineSync<S, O, E>, key: &str, payload: &str, ttl: Duration) -> Result<()>
where
    S: PersistentStore + 'static,
    O: NetworkObserver + 'static,
    E: RemoteActionExecutor + 'static,
{
    if ttl.is_zero() {
        return Err(Error::InvalidTtl("0".to_string()));
    }
    let value = parse_json(payload)?;
    sync.cache_put(key, &value, ttl)?;
    Ok(())
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
