// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tdrs - library behind the `tandem` CLI.
//!
//! Wires the offline sync service from `td-sync` to a SQLite store on disk,
//! an HTTP executor and, for `tandem watch`, a reachability probe.
//!
//! # Main Components
//!
//! - [`Config`] - `tandem.toml` settings (store location, remote, retry cap)
//! - [`Cli`] - command-line definition
//! - [`Error`] - error type for all commands
//!
//! ```rust,ignore
//! use clap::Parser;
//!
//! let cli = tdrs::Cli::parse_from(["tandem", "pending", "-o", "json"]);
//! tdrs::run(cli)?;
//! ```

mod cli;
mod commands;

pub mod config;
pub mod env;
pub mod error;
pub mod logging;

pub use cli::{CacheCommand, Cli, Command, ConfigCommand, GlobalArgs, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};

/// Execute a parsed command line. This is the main entry point for library
/// users and provides a testable way to run commands without process
/// execution.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.global.config.as_deref())?;

    match cli.command {
        Command::Status { output } => commands::status::run(&config, output),
        Command::Pending { dropped, output } => commands::pending::run(&config, dropped, output),
        Command::Enqueue { kind, payload } => commands::enqueue::run(&config, &kind, &payload),
        Command::Drain { output } => commands::drain::run(&config, output),
        Command::Watch => commands::watch::run(&config),
        Command::Cache(cmd) => commands::cache::run(&config, cmd),
        Command::Config(cmd) => commands::config::run(&config, cmd),
    }
}
