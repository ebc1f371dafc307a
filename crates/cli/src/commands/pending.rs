// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use td_core::{DroppedAction, OfflineAction};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;

use super::open_local;

pub fn run(config: &Config, dropped: bool, output: OutputFormat) -> Result<()> {
    let sync = open_local(config)?;
    let out = if dropped {
        render_dropped(&sync.dropped_actions(), output)?
    } else {
        render_pending(&sync.pending_actions(), output)?
    };
    print!("{}", out);
    Ok(())
}

pub fn render_pending(actions: &[OfflineAction], output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(actions)?)),
        OutputFormat::Text => {
            if actions.is_empty() {
                return Ok("No pending actions.\n".to_string());
            }
            let mut out = String::new();
            for action in actions {
                out.push_str(&format!(
                    "{}  {}  {}  attempts={}  {}\n",
                    action.id,
                    action.created_at.format("%Y-%m-%d %H:%M:%S"),
                    action.kind,
                    action.attempts,
                    action.payload
                ));
                if let Some(error) = &action.last_error {
                    out.push_str(&format!("    last error: {}\n", error));
                }
            }
            Ok(out)
        }
    }
}

pub fn render_dropped(dropped: &[DroppedAction], output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(dropped)?)),
        OutputFormat::Text => {
            if dropped.is_empty() {
                return Ok("No dropped actions.\n".to_string());
            }
            let mut out = String::new();
            for entry in dropped {
                let action = &entry.action;
                out.push_str(&format!(
                    "{}  {}  {}  {} after {} attempt{}  {}\n",
                    action.id,
                    entry.dropped_at.format("%Y-%m-%d %H:%M:%S"),
                    action.kind,
                    entry.reason,
                    action.attempts,
                    if action.attempts == 1 { "" } else { "s" },
                    action.payload
                ));
                if let Some(error) = &action.last_error {
                    out.push_str(&format!("    last error: {}\n", error));
                }
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
