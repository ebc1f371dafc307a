// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors surfaced by the `tandem` CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidKind(#[from] td_core::action::ParseKindError),

    #[error("invalid payload: {0}\n  hint: the payload must be a JSON object, e.g. '{{\"lessonId\": \"1\"}}'")]
    InvalidPayload(String),

    #[error("invalid ttl: {0}\n  hint: ttl is a positive number of seconds")]
    InvalidTtl(String),

    #[error("no cached entry for '{0}' (missing or expired)")]
    NotCached(String),

    #[error("action could not be saved; see the log for the storage error")]
    EnqueueFailed,

    #[error("a drain is already running")]
    DrainInProgress,

    #[error("storage error: {0}")]
    Storage(#[from] td_core::StorageError),

    #[error("{0}")]
    Sync(#[from] td_sync::SyncError),

    #[error("remote setup failed: {0}")]
    Remote(#[from] td_sync::HttpSetupError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for tdrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
