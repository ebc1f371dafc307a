// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test doubles for sync tests.

#![allow(clippy::unwrap_used)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use td_core::{ActionQueue, MemoryStore, OfflineAction, PersistentStore, StorageError, StorageResult};
use tokio::sync::{Notify, Semaphore};

use crate::executor::{ExecuteError, ExecuteResult, RemoteActionExecutor};

/// Executor that records calls and fails on scripted payloads.
#[derive(Default)]
pub struct MockExecutor {
    calls: Mutex<Vec<OfflineAction>>,
    failures: Mutex<Vec<(Value, ExecuteError)>>,
    fail_all: Mutex<Option<ExecuteError>>,
    gate: Option<Semaphore>,
    entered: Notify,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor whose calls block until [`release`](Self::release).
    pub fn gated() -> Self {
        MockExecutor { gate: Some(Semaphore::new(0)), ..Self::default() }
    }

    /// Fails every call whose payload equals `payload`.
    pub fn fail_payload(&self, payload: Value, err: ExecuteError) {
        self.failures.lock().unwrap().push((payload, err));
    }

    /// Fails every call.
    pub fn fail_all(&self, err: ExecuteError) {
        *self.fail_all.lock().unwrap() = Some(err);
    }

    /// Lets gated calls through.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1_000);
        }
    }

    /// Waits until a call has entered the executor.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn calls(&self) -> Vec<OfflineAction> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.calls().into_iter().map(|a| a.payload).collect()
    }
}

impl RemoteActionExecutor for MockExecutor {
    fn execute<'a>(
        &'a self,
        action: &'a OfflineAction,
    ) -> Pin<Box<dyn Future<Output = ExecuteResult<()>> + Send + 'a>> {
        Box::pin(async move {
            self.entered.notify_one();
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            self.calls.lock().unwrap().push(action.clone());

            if let Some(err) = self.fail_all.lock().unwrap().clone() {
                return Err(err);
            }
            let failures = self.failures.lock().unwrap();
            match failures.iter().find(|(payload, _)| payload == &action.payload) {
                Some((_, err)) => Err(err.clone()),
                None => Ok(()),
            }
        })
    }
}

/// Store whose every operation fails.
pub struct UnavailableStore;

impl PersistentStore for UnavailableStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("storage offline".into()))
    }
    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }
    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("storage offline".into()))
    }
    fn clear(&self) -> StorageResult<()> {
        Err(StorageError::Unavailable("storage offline".into()))
    }
    fn keys_with_prefix(&self, _prefix: &str) -> StorageResult<Vec<String>> {
        Err(StorageError::Unavailable("storage offline".into()))
    }
}

pub fn memory_queue() -> Arc<ActionQueue<MemoryStore>> {
    Arc::new(ActionQueue::new(Arc::new(MemoryStore::new())))
}

pub fn server_error() -> ExecuteError {
    ExecuteError::Server { status: 503, message: "unavailable".into() }
}

pub fn rejected() -> ExecuteError {
    ExecuteError::Rejected { status: 422, message: "unknown lesson".into() }
}

/// Polls `condition` until it holds, panicking after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(tokio::time::Instant::now() < deadline, "condition not met within 2s");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
