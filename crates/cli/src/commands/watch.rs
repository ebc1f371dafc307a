// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running delivery loop.
//!
//! A reachability probe stands in for platform connectivity callbacks; the
//! engine drains whenever the probe sees the remote come back.

use std::sync::Arc;

use td_sync::{NetworkObserver, ReachabilityProbe};

use crate::config::Config;
use crate::error::Result;

use super::{open_sync, runtime};

pub fn run(config: &Config) -> Result<()> {
    let probe = Arc::new(ReachabilityProbe::new(config.probe_config()?));
    let sync = open_sync(config, Arc::clone(&probe))?;

    runtime()?.block_on(async {
        let probe_task = probe.spawn();
        let engine_task = sync.start();
        let mut connectivity = probe.subscribe();

        eprintln!(
            "Watching {} ({}). Press Ctrl-C to stop.",
            config.remote.base_url,
            sync.status().summary()
        );

        loop {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                    }
                    break;
                }
                changed = connectivity.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = *connectivity.borrow_and_update();
                    eprintln!("Remote is {}. {}", state, sync.status().summary());
                }
            }
        }

        sync.shutdown();
        probe.cancel();
        if let Some(task) = engine_task {
            let _ = task.await;
        }
        let _ = probe_task.await;
    });

    let pending = sync.pending_action_count();
    if pending > 0 {
        eprintln!("Stopped with {} pending change{}.", pending, if pending == 1 { "" } else { "s" });
    }
    Ok(())
}
