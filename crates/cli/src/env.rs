// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the `TANDEM_LOG` filter directive if set.
pub fn log_filter() -> Option<String> {
    std::env::var(vars::TANDEM_LOG).ok().filter(|v| !v.is_empty())
}

/// Returns the value of `TANDEM_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    std::env::var(vars::TANDEM_CONFIG).ok().map(PathBuf::from)
}

/// Returns the value of `TANDEM_DATA_DIR` if set.
pub fn data_dir() -> Option<PathBuf> {
    std::env::var(vars::TANDEM_DATA_DIR).ok().map(PathBuf::from)
}

/// Returns `TANDEM_AUTH_TOKEN`, which takes precedence over the config file.
pub fn auth_token() -> Option<String> {
    std::env::var(vars::TANDEM_AUTH_TOKEN).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
