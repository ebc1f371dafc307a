// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable FIFO queue of pending mutations.
//!
//! The queue is stored as JSONL text under a single store key, in creation
//! order. An action leaves the queue only when the remote confirms it or when
//! it has failed `max_attempts` times; in the second case it is moved to a
//! bounded list of dropped actions so the loss can be surfaced.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::action::{ActionId, ActionKind, DropReason, DroppedAction, OfflineAction};
use crate::error::StorageError;
use crate::jsonl;
use crate::store::PersistentStore;

/// Lifetime attempt cap, counted across drains.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Store key holding pending actions.
const PENDING_KEY: &str = "queue:pending";
/// Store key holding dropped actions.
const DROPPED_KEY: &str = "queue:dropped";
/// Dropped actions kept for display; older ones are forgotten.
const DROPPED_LIMIT: usize = 50;

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// What happened to an action after a failed attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureOutcome {
    /// Still queued for the next drain.
    Retained { attempts: u32 },
    /// Retry budget exhausted; the action was removed.
    Dropped(DroppedAction),
    /// The id was not in the queue.
    NotFound,
}

/// Durable queue of offline actions.
pub struct ActionQueue<S: PersistentStore> {
    store: Arc<S>,
    max_attempts: u32,
    /// Serializes read-modify-write cycles on the stored list.
    write_lock: Mutex<()>,
}

impl<S: PersistentStore> ActionQueue<S> {
    /// Creates a queue over the given store with the default attempt cap.
    pub fn new(store: Arc<S>) -> Self {
        ActionQueue { store, max_attempts: DEFAULT_MAX_ATTEMPTS, write_lock: Mutex::new(()) }
    }

    /// Sets the attempt cap. Values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Appends a new action and returns its id.
    ///
    /// The action is persisted before this returns.
    pub fn enqueue(&self, kind: ActionKind, payload: serde_json::Value) -> QueueResult<ActionId> {
        let action = OfflineAction::new(kind, payload);
        let id = action.id.clone();

        let _guard = self.lock();
        let mut pending = self.read_pending()?;
        pending.push(action);
        self.write_pending(&pending)?;

        tracing::debug!(%id, %kind, pending = pending.len(), "enqueued offline action");
        Ok(id)
    }

    /// Reads all queued actions in creation order without removing them.
    pub fn peek_all(&self) -> QueueResult<Vec<OfflineAction>> {
        self.read_pending()
    }

    /// Removes a delivered action. Returns false if it was not queued.
    pub fn mark_succeeded(&self, id: &ActionId) -> QueueResult<bool> {
        let _guard = self.lock();
        let mut pending = self.read_pending()?;
        let before = pending.len();
        pending.retain(|a| &a.id != id);

        if pending.len() == before {
            return Ok(false);
        }
        self.write_pending(&pending)?;
        Ok(true)
    }

    /// Records a failed attempt.
    ///
    /// Once the action has failed `max_attempts` times it is removed from the
    /// queue and recorded as dropped.
    pub fn mark_failed(&self, id: &ActionId, error: &str) -> QueueResult<FailureOutcome> {
        let _guard = self.lock();
        let mut pending = self.read_pending()?;

        let Some(index) = pending.iter().position(|a| &a.id == id) else {
            return Ok(FailureOutcome::NotFound);
        };

        let action = &mut pending[index];
        action.attempts = action.attempts.saturating_add(1);
        action.last_error = Some(error.to_string());
        let attempts = action.attempts;

        if attempts < self.max_attempts {
            self.write_pending(&pending)?;
            return Ok(FailureOutcome::Retained { attempts });
        }

        let action = pending.remove(index);
        self.write_pending(&pending)?;
        let dropped = self.record_dropped(action, DropReason::RetriesExhausted)?;
        Ok(FailureOutcome::Dropped(dropped))
    }

    /// Removes an action the remote refused as permanently invalid.
    ///
    /// Counts the refusal as an attempt and records the action as dropped.
    pub fn mark_rejected(&self, id: &ActionId, error: &str) -> QueueResult<Option<DroppedAction>> {
        let _guard = self.lock();
        let mut pending = self.read_pending()?;

        let Some(index) = pending.iter().position(|a| &a.id == id) else {
            return Ok(None);
        };

        let mut action = pending.remove(index);
        action.attempts = action.attempts.saturating_add(1);
        action.last_error = Some(error.to_string());

        self.write_pending(&pending)?;
        let dropped = self.record_dropped(action, DropReason::Rejected)?;
        Ok(Some(dropped))
    }

    /// Number of pending actions.
    pub fn len(&self) -> QueueResult<usize> {
        Ok(self.read_pending()?.len())
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Discards all pending actions.
    pub fn clear(&self) -> QueueResult<()> {
        let _guard = self.lock();
        self.store.remove(PENDING_KEY)?;
        Ok(())
    }

    /// Actions that left the queue undelivered, oldest first.
    pub fn dropped(&self) -> QueueResult<Vec<DroppedAction>> {
        let Some(text) = self.store.get(DROPPED_KEY)? else {
            return Ok(Vec::new());
        };
        Ok(jsonl::decode(&text).records)
    }

    /// Forgets all dropped actions.
    pub fn clear_dropped(&self) -> QueueResult<()> {
        let _guard = self.lock();
        self.store.remove(DROPPED_KEY)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read_pending(&self) -> QueueResult<Vec<OfflineAction>> {
        let Some(text) = self.store.get(PENDING_KEY)? else {
            return Ok(Vec::new());
        };

        let decoded = jsonl::decode::<OfflineAction>(&text);
        if decoded.skipped > 0 {
            // Dropped from the list on the next write
            tracing::warn!(skipped = decoded.skipped, "skipping unreadable queued actions");
        }
        Ok(decoded.records)
    }

    fn write_pending(&self, pending: &[OfflineAction]) -> QueueResult<()> {
        if pending.is_empty() {
            self.store.remove(PENDING_KEY)?;
        } else {
            self.store.set(PENDING_KEY, &jsonl::encode(pending)?)?;
        }
        Ok(())
    }

    fn record_dropped(&self, action: OfflineAction, reason: DropReason) -> QueueResult<DroppedAction> {
        tracing::warn!(
            id = %action.id,
            kind = %action.kind,
            attempts = action.attempts,
            %reason,
            last_error = action.last_error.as_deref().unwrap_or(""),
            "dropping undeliverable offline action"
        );

        let dropped = DroppedAction { action, reason, dropped_at: Utc::now() };

        let mut list = self.dropped()?;
        list.push(dropped.clone());
        if list.len() > DROPPED_LIMIT {
            let excess = list.len() - DROPPED_LIMIT;
            list.drain(..excess);
        }
        self.store.set(DROPPED_KEY, &jsonl::encode(&list)?)?;

        Ok(dropped)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
