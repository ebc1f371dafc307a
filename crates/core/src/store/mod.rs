// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable key/value storage.
//!
//! [`PersistentStore`] is the only thing the cache and the action queue know
//! about the device. The backing medium is swappable: [`SqliteStore`] for a
//! file on disk, [`MemoryStore`] for tests and throwaway sessions.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StorageResult;

/// Durable string key/value storage surviving process restarts.
///
/// Implementations must be safe to share between the cache, the queue and
/// the sync engine within one process. Sharing one store between processes
/// is not supported.
pub trait PersistentStore: Send + Sync {
    /// Reads a value, `None` if the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Removes every key.
    fn clear(&self) -> StorageResult<()>;

    /// Returns all keys starting with `prefix`, sorted.
    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>>;
}
