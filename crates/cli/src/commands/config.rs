// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::ConfigCommand;
use crate::config::{default_config_path, Config};
use crate::error::{Error, Result};

pub fn run(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => print!("{}", render_show(config)?),
        ConfigCommand::Path => {
            let path = default_config_path()
                .ok_or_else(|| Error::Config("cannot determine config directory".to_string()))?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Effective settings, with the resolved store path as a leading comment.
pub fn render_show(config: &Config) -> Result<String> {
    let mut out = format!("# store: {}\n", config.store_path()?.display());
    out.push_str(&config.to_redacted_toml()?);
    Ok(out)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
