// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use td_sync::{ConnectivityState, ManualObserver, ReachabilityProbe, SyncStatus};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;

use super::{open_sync, runtime};

/// Probes the remote once and prints queue health.
pub fn run(config: &Config, output: OutputFormat) -> Result<()> {
    let probe = config.probe_config()?;
    let reachable = runtime()?.block_on(ReachabilityProbe::probe_once(&probe.address, probe.timeout));
    let state = if reachable { ConnectivityState::Online } else { ConnectivityState::Offline };

    let sync = open_sync(config, Arc::new(ManualObserver::new(state)))?;
    let status = sync.status();
    print!("{}", render(&status, &config.remote.base_url, output)?);
    Ok(())
}

pub fn render(status: &SyncStatus, remote: &str, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!("Remote:  {} ({})\n", remote, status.connectivity));
            out.push_str(&format!("Pending: {}\n", status.pending));
            out.push_str(&format!("Dropped: {}\n", status.dropped));
            out.push_str(&format!("{}\n", status.summary()));
            if status.dropped > 0 {
                out.push_str("hint: run 'tandem pending --dropped' to see undelivered actions\n");
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "remote": remote,
                "connectivity": status.connectivity,
                "engine": status.engine,
                "pending": status.pending,
                "dropped": status.dropped,
                "summary": status.summary(),
            });
            Ok(format!("{}\n", serde_json::to_string_pretty(&json)?))
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
