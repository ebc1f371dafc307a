// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! td-core: Durable building blocks for tandem's offline resilience layer.
//!
//! This crate provides the storage primitives shared by the sync engine and
//! the `tandem` CLI:
//!
//! - [`PersistentStore`] - durable key/value strings ([`SqliteStore`], [`MemoryStore`])
//! - [`CacheStore`] - TTL cache with lazy eviction on read
//! - [`ActionQueue`] - durable FIFO of pending mutations with a retry cap

pub mod action;
pub mod cache;
pub mod clock;
pub mod error;
pub mod jsonl;
pub mod queue;
pub mod store;

pub use action::{ActionId, ActionKind, DropReason, DroppedAction, OfflineAction};
pub use cache::{CacheEntry, CacheError, CacheLookup, CacheResult, CacheStore};
pub use clock::{ClockSource, ManualClock, SystemClock};
pub use error::{StorageError, StorageResult};
pub use queue::{ActionQueue, FailureOutcome, QueueError, QueueResult, DEFAULT_MAX_ATTEMPTS};
pub use store::{MemoryStore, PersistentStore, SqliteStore};
