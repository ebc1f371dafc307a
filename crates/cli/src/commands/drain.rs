// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use td_sync::{ConnectivityState, DrainReport, ManualObserver};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::{Error, Result};

use super::{open_sync, runtime};

/// Runs one delivery pass against the configured remote.
pub fn run(config: &Config, output: OutputFormat) -> Result<()> {
    let sync = open_sync(config, Arc::new(ManualObserver::new(ConnectivityState::Online)))?;
    let report = runtime()?.block_on(sync.sync_now()).ok_or(Error::DrainInProgress)?;
    let pending = sync.pending_action_count();
    print!("{}", render(&report, pending, output)?);
    Ok(())
}

pub fn render(report: &DrainReport, pending: usize, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "attempted": report.attempted,
                "succeeded": report.succeeded,
                "retained": report.retained,
                "dropped": report.dropped,
                "pending": pending,
            });
            Ok(format!("{}\n", serde_json::to_string_pretty(&json)?))
        }
        OutputFormat::Text => {
            if report.attempted == 0 {
                return Ok("Nothing to sync.\n".to_string());
            }
            let mut out = format!(
                "Delivered {} of {} action{}",
                report.succeeded,
                report.attempted,
                if report.attempted == 1 { "" } else { "s" }
            );
            if report.retained > 0 || report.dropped > 0 {
                out.push_str(&format!(" ({} will retry, {} dropped)", report.retained, report.dropped));
            }
            out.push('\n');
            if pending > 0 {
                out.push_str(&format!("{} still pending\n", pending));
            }
            if report.dropped > 0 {
                out.push_str("hint: run 'tandem pending --dropped' to see undelivered actions\n");
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
