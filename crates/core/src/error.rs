// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Storage error type shared by every [`PersistentStore`](crate::PersistentStore).

use thiserror::Error;

/// Failure of the durable store underneath the cache and the action queue.
///
/// Callers above the store treat these as non-fatal: a read failure becomes a
/// cache miss, a write failure loses the cached value or the queued action.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store lock poisoned")]
    LockPoisoned,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A specialized Result type for store operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
