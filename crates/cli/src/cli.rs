// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  tandem enqueue complete_step '{\"lessonId\": \"1\", \"step\": 2}'
  tandem pending                 List changes waiting to sync
  tandem drain                   Deliver them to the remote now
  tandem watch                   Deliver automatically when the remote is reachable";

#[derive(Parser)]
#[command(name = "tandem", version)]
#[command(about = "Offline cache and sync queue for learning-app data")]
#[command(
    long_about = "Offline cache and sync queue for learning-app data.\n\n\
    Changes made offline are queued on disk and delivered to the remote \
    REST service, in order, once it is reachable again."
)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show connectivity and queue health
    Status {
        /// Output format
        #[arg(long, short = 'o', value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// List queued actions
    #[command(after_help = "Examples:\n  \
        tandem pending                 Actions waiting to sync\n  \
        tandem pending --dropped       Actions that were given up on\n  \
        tandem pending -o json         Machine-readable listing")]
    Pending {
        /// Show dropped actions instead of pending ones
        #[arg(long)]
        dropped: bool,

        /// Output format
        #[arg(long, short = 'o', value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Queue an action for delivery
    #[command(arg_required_else_help = true)]
    Enqueue {
        /// Action kind: update_progress, complete_step, record_pronunciation_score
        kind: String,

        /// JSON object payload
        payload: String,
    },

    /// Deliver queued actions now, in one pass
    Drain {
        /// Output format
        #[arg(long, short = 'o', value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Deliver queued actions whenever the remote is reachable, until Ctrl-C
    Watch,

    /// Manage the local cache
    #[command(subcommand)]
    Cache(CacheCommand),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Print a cached payload
    Get {
        key: String,
    },

    /// Store a JSON payload
    Put {
        key: String,

        /// JSON payload
        payload: String,

        /// Time to live in seconds (default from config)
        #[arg(long)]
        ttl: Option<u64>,
    },

    /// Remove every cache entry (queued actions are kept)
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the default config file location
    Path,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
