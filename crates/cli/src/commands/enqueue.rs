// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use td_core::{ActionId, ActionKind, PersistentStore};
use td_sync::{NetworkObserver, OfflineSync, RemoteActionExecutor};

use crate::config::Config;
use crate::error::{Error, Result};

use super::{open_local, parse_object};

/// Queues an action and prints its id.
pub fn run(config: &Config, kind: &str, payload: &str) -> Result<()> {
    let sync = open_local(config)?;
    let id = enqueue(&sync, kind, payload)?;
    println!("{}", id);
    Ok(())
}

pub fn enqueue<S, O, E>(sync: &OfflineSync<S, O, E>, kind: &str, payload: &str) -> Result<ActionId>
where
    S: PersistentStore + 'static,
    O: NetworkObserver + 'static,
    E: RemoteActionExecutor + 'static,
{
    let kind: ActionKind = kind.parse()?;
    let payload = parse_object(payload)?;
    sync.enqueue_offline_action(kind, payload).ok_or(Error::EnqueueFailed)
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
