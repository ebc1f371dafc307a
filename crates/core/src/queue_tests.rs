// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the action queue module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use super::*;
use crate::store::{MemoryStore, SqliteStore};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::tempdir;

fn memory_queue() -> (Arc<MemoryStore>, ActionQueue<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (Arc::clone(&store), ActionQueue::new(store))
}

#[test]
fn test_new_queue_is_empty() {
    let (_store, queue) = memory_queue();
    assert!(queue.is_empty().unwrap());
    assert!(queue.peek_all().unwrap().is_empty());
    assert_eq!(queue.max_attempts(), DEFAULT_MAX_ATTEMPTS);
}

#[test]
fn test_enqueue_and_peek_fifo() {
    let (_store, queue) = memory_queue();

    let a = queue.enqueue(ActionKind::CompleteStep, json!({"step": 1})).unwrap();
    let b = queue.enqueue(ActionKind::UpdateProgress, json!({"percent": 40})).unwrap();

    let actions = queue.peek_all().unwrap();
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].id, a);
    assert_eq!(actions[1].id, b);
    assert_eq!(actions[0].attempts, 0);
    assert_eq!(actions[1].payload["percent"], 40);
}

#[test]
fn test_peek_does_not_remove() {
    let (_store, queue) = memory_queue();
    queue.enqueue(ActionKind::CompleteStep, json!({})).unwrap();

    queue.peek_all().unwrap();
    queue.peek_all().unwrap();
    assert_eq!(queue.len().unwrap(), 1);
}

#[test]
fn test_mark_succeeded_removes_only_that_action() {
    let (_store, queue) = memory_queue();
    let a = queue.enqueue(ActionKind::CompleteStep, json!({"step": 1})).unwrap();
    let b = queue.enqueue(ActionKind::CompleteStep, json!({"step": 2})).unwrap();
    let c = queue.enqueue(ActionKind::CompleteStep, json!({"step": 3})).unwrap();

    assert!(queue.mark_succeeded(&b).unwrap());

    let ids: Vec<_> = queue.peek_all().unwrap().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn test_mark_succeeded_unknown_id() {
    let (_store, queue) = memory_queue();
    queue.enqueue(ActionKind::CompleteStep, json!({})).unwrap();

    assert!(!queue.mark_succeeded(&ActionId::from("missing")).unwrap());
    assert_eq!(queue.len().unwrap(), 1);
}

#[test]
fn test_mark_failed_increments_attempts_and_keeps_position() {
    let (_store, queue) = memory_queue();
    let a = queue.enqueue(ActionKind::CompleteStep, json!({"step": 1})).unwrap();
    let b = queue.enqueue(ActionKind::CompleteStep, json!({"step": 2})).unwrap();

    let outcome = queue.mark_failed(&a, "connection reset").unwrap();
    assert_eq!(outcome, FailureOutcome::Retained { attempts: 1 });

    let actions = queue.peek_all().unwrap();
    assert_eq!(actions[0].id, a);
    assert_eq!(actions[0].attempts, 1);
    assert_eq!(actions[0].last_error.as_deref(), Some("connection reset"));
    assert_eq!(actions[1].id, b);
    assert_eq!(actions[1].attempts, 0);
}

#[test]
fn test_retry_cap_drops_after_max_attempts() {
    let (_store, queue) = memory_queue();
    let id = queue.enqueue(ActionKind::RecordPronunciationScore, json!({"score": 87})).unwrap();

    assert_eq!(queue.mark_failed(&id, "timeout").unwrap(), FailureOutcome::Retained { attempts: 1 });
    assert_eq!(queue.mark_failed(&id, "timeout").unwrap(), FailureOutcome::Retained { attempts: 2 });
    assert_eq!(queue.len().unwrap(), 1);

    let outcome = queue.mark_failed(&id, "timeout").unwrap();
    let FailureOutcome::Dropped(dropped) = outcome else {
        panic!("expected drop on third failure, got {outcome:?}");
    };
    assert_eq!(dropped.action.id, id);
    assert_eq!(dropped.action.attempts, 3);
    assert_eq!(dropped.reason, DropReason::RetriesExhausted);

    assert!(queue.is_empty().unwrap());
    assert_eq!(queue.dropped().unwrap().len(), 1);
}

#[test]
fn test_custom_max_attempts() {
    let store = Arc::new(MemoryStore::new());
    let queue = ActionQueue::new(store).with_max_attempts(1);
    let id = queue.enqueue(ActionKind::CompleteStep, json!({})).unwrap();

    assert!(matches!(queue.mark_failed(&id, "boom").unwrap(), FailureOutcome::Dropped(_)));
}

#[test]
fn test_zero_max_attempts_is_raised_to_one() {
    let store = Arc::new(MemoryStore::new());
    let queue = ActionQueue::new(store).with_max_attempts(0);
    assert_eq!(queue.max_attempts(), 1);
}

#[test]
fn test_mark_failed_unknown_id() {
    let (_store, queue) = memory_queue();
    let outcome = queue.mark_failed(&ActionId::from("missing"), "boom").unwrap();
    assert_eq!(outcome, FailureOutcome::NotFound);
}

#[test]
fn test_mark_rejected_drops_immediately() {
    let (_store, queue) = memory_queue();
    let a = queue.enqueue(ActionKind::CompleteStep, json!({"bad": true})).unwrap();
    let b = queue.enqueue(ActionKind::CompleteStep, json!({"step": 2})).unwrap();

    let dropped = queue.mark_rejected(&a, "422 unprocessable").unwrap().unwrap();
    assert_eq!(dropped.reason, DropReason::Rejected);
    assert_eq!(dropped.action.attempts, 1);

    let remaining = queue.peek_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b);
}

/// Memory store whose writes to the pending list can be made to fail.
#[derive(Default)]
struct PendingWriteFails {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl PersistentStore for PendingWriteFails {
    fn get(&self, key: &str) -> crate::error::StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> crate::error::StorageResult<()> {
        if key == PENDING_KEY && self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> crate::error::StorageResult<()> {
        self.inner.remove(key)
    }

    fn clear(&self) -> crate::error::StorageResult<()> {
        self.inner.clear()
    }

    fn keys_with_prefix(&self, prefix: &str) -> crate::error::StorageResult<Vec<String>> {
        self.inner.keys_with_prefix(prefix)
    }
}

#[test]
fn test_failed_pending_write_does_not_record_drop() {
    let store = Arc::new(PendingWriteFails::default());
    let queue = ActionQueue::new(Arc::clone(&store)).with_max_attempts(1);
    let a = queue.enqueue(ActionKind::CompleteStep, json!({"step": 1})).unwrap();
    let b = queue.enqueue(ActionKind::CompleteStep, json!({"step": 2})).unwrap();

    store.failing.store(true, Ordering::SeqCst);
    assert!(queue.mark_failed(&a, "boom").is_err());
    assert!(queue.mark_rejected(&b, "422").is_err());

    // Still pending, so neither may be listed as lost
    assert_eq!(queue.len().unwrap(), 2);
    assert!(queue.dropped().unwrap().is_empty());

    store.failing.store(false, Ordering::SeqCst);
    assert!(matches!(queue.mark_failed(&a, "boom").unwrap(), FailureOutcome::Dropped(_)));
    assert_eq!(queue.dropped().unwrap().len(), 1);
}

#[test]
fn test_dropped_list_is_bounded() {
    let (_store, queue) = memory_queue();
    let queue = queue.with_max_attempts(1);

    let mut last = None;
    for step in 0..(DROPPED_LIMIT + 5) {
        let id = queue.enqueue(ActionKind::CompleteStep, json!({"step": step})).unwrap();
        queue.mark_failed(&id, "boom").unwrap();
        last = Some(id);
    }

    let dropped = queue.dropped().unwrap();
    assert_eq!(dropped.len(), DROPPED_LIMIT);
    assert_eq!(dropped[0].action.payload["step"], 5);
    assert_eq!(dropped.last().map(|d| d.action.id.clone()), last);

    queue.clear_dropped().unwrap();
    assert!(queue.dropped().unwrap().is_empty());
}

#[test]
fn test_clear() {
    let (store, queue) = memory_queue();
    queue.enqueue(ActionKind::CompleteStep, json!({})).unwrap();
    queue.enqueue(ActionKind::CompleteStep, json!({})).unwrap();

    queue.clear().unwrap();
    assert!(queue.is_empty().unwrap());
    assert!(store.is_empty());
}

#[test]
fn test_corrupt_line_is_skipped_and_purged_on_next_write() {
    let (store, queue) = memory_queue();
    let a = queue.enqueue(ActionKind::CompleteStep, json!({"step": 1})).unwrap();

    let mut text = store.get(PENDING_KEY).unwrap().unwrap();
    text.push_str("{\"id\":\"torn\",\"ki\n");
    store.set(PENDING_KEY, &text).unwrap();

    let actions = queue.peek_all().unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].id, a);

    queue.enqueue(ActionKind::CompleteStep, json!({"step": 2})).unwrap();
    let stored = store.get(PENDING_KEY).unwrap().unwrap();
    assert!(!stored.contains("torn"));
    assert_eq!(stored.lines().count(), 2);
}

#[test]
fn test_persistence() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.db");

    // Write actions with one queue instance
    let first = {
        let queue = ActionQueue::new(Arc::new(SqliteStore::open(&path).unwrap()));
        let first = queue.enqueue(ActionKind::CompleteStep, json!({"lessonId": "1", "step": 2})).unwrap();
        queue.enqueue(ActionKind::UpdateProgress, json!({"lessonId": "1", "percent": 50})).unwrap();
        queue.mark_failed(&first, "offline").unwrap();
        first
    };

    // Read with new instance
    let queue = ActionQueue::new(Arc::new(SqliteStore::open(&path).unwrap()));
    let actions = queue.peek_all().unwrap();
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].id, first);
    assert_eq!(actions[0].attempts, 1);
    assert_eq!(actions[1].kind, ActionKind::UpdateProgress);
}
