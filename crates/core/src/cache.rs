// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! TTL cache layered on a [`PersistentStore`].
//!
//! Entries are stamped with the clock time when written and checked on every
//! read. Expired and unreadable entries are deleted by the read that finds
//! them; nothing sweeps the store in the background, so an entry that is
//! never read again stays on disk until [`CacheStore::clear`].

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::clock::{ClockSource, SystemClock};
use crate::error::StorageError;
use crate::store::PersistentStore;

/// Store key namespace for cache entries.
const KEY_PREFIX: &str = "cache:";

/// Error type for cache writes.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("invalid ttl: must be greater than zero")]
    InvalidTtl,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// A cached payload with its freshness window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub key: String,
    pub payload: T,
    /// Write time in milliseconds since Unix epoch.
    pub stored_at: u64,
    pub ttl_ms: u64,
}

impl<T> CacheEntry<T> {
    /// True once more than `ttl_ms` has passed since `stored_at`.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at) > self.ttl_ms
    }
}

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
}

impl<T> CacheLookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    /// Converts into an `Option`, `None` on a miss.
    pub fn hit(self) -> Option<T> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss => None,
        }
    }
}

/// TTL cache with lazy eviction.
pub struct CacheStore<S: PersistentStore, C: ClockSource = SystemClock> {
    store: Arc<S>,
    clock: C,
}

impl<S: PersistentStore> CacheStore<S, SystemClock> {
    /// Creates a cache over the given store using the system clock.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: PersistentStore, C: ClockSource> CacheStore<S, C> {
    /// Creates a cache with a custom clock source.
    pub fn with_clock(store: Arc<S>, clock: C) -> Self {
        CacheStore { store, clock }
    }

    /// Writes `payload` under `key`, fresh for `ttl` from now.
    pub fn put<T: Serialize + ?Sized>(&self, key: &str, payload: &T, ttl: Duration) -> CacheResult<()> {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        if ttl_ms == 0 {
            return Err(CacheError::InvalidTtl);
        }

        let entry = CacheEntry {
            key: key.to_string(),
            payload,
            stored_at: self.clock.now_ms(),
            ttl_ms,
        };
        let json = serde_json::to_string(&entry)?;
        self.store.set(&storage_key(key), &json)?;

        tracing::debug!(key, ttl_ms, "cached entry");
        Ok(())
    }

    /// Reads `key`.
    ///
    /// Returns `Miss` when the entry is absent, expired or unreadable; the
    /// latter two are deleted on the way out. Store failures are logged and
    /// reported as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        let storage_key = storage_key(key);

        let raw = match self.store.get(&storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheLookup::Miss,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed, treating as miss");
                return CacheLookup::Miss;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable cache entry");
                self.evict(&storage_key);
                return CacheLookup::Miss;
            }
        };

        if entry.is_expired(self.clock.now_ms()) {
            tracing::debug!(key, "cache entry expired");
            self.evict(&storage_key);
            return CacheLookup::Miss;
        }

        CacheLookup::Hit(entry.payload)
    }

    /// Removes a single entry.
    pub fn remove(&self, key: &str) -> CacheResult<()> {
        self.store.remove(&storage_key(key))?;
        Ok(())
    }

    /// Removes every cache entry. Other namespaces in the store are untouched.
    pub fn clear(&self) -> CacheResult<usize> {
        let keys = self.store.keys_with_prefix(KEY_PREFIX)?;
        for key in &keys {
            self.store.remove(key)?;
        }
        Ok(keys.len())
    }

    /// Keys currently on disk, including expired entries not yet read.
    pub fn keys(&self) -> CacheResult<Vec<String>> {
        Ok(self
            .store
            .keys_with_prefix(KEY_PREFIX)?
            .into_iter()
            .filter_map(|k| k.strip_prefix(KEY_PREFIX).map(String::from))
            .collect())
    }

    fn evict(&self, storage_key: &str) {
        if let Err(e) = self.store.remove(storage_key) {
            tracing::warn!(key = storage_key, error = %e, "failed to evict cache entry");
        }
    }
}

fn storage_key(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
