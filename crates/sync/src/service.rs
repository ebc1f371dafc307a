// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Application-facing offline sync service.
//!
//! [`OfflineSync`] is built once at startup from a store, a connectivity
//! observer and an executor, and then shared by whatever needs to read
//! cached content or record changes. Reads and writes never fail loudly:
//! storage trouble is logged and shows up as a cache miss, a lost action
//! or a zero count.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use td_core::{
    ActionId, ActionKind, ActionQueue, CacheError, CacheLookup, CacheStore, ClockSource, DroppedAction,
    OfflineAction, PersistentStore, QueueError, SystemClock, DEFAULT_MAX_ATTEMPTS,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::engine::{DrainReport, EngineConfig, EngineState, SyncEngine, SyncTrigger};
use crate::executor::RemoteActionExecutor;
use crate::network::{ConnectivityState, NetworkObserver};

/// Configuration for the sync service.
#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    /// Lifetime attempt cap per action.
    pub max_attempts: u32,
    /// Drop actions the remote refuses as invalid instead of retrying them.
    pub drop_permanent_rejections: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig { max_attempts: DEFAULT_MAX_ATTEMPTS, drop_permanent_rejections: false }
    }
}

/// Error type for service calls that report failure.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Queue error.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
}

/// Result type for service calls.
pub type SyncResult<T> = Result<T, SyncError>;

/// Snapshot of sync health for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub connectivity: ConnectivityState,
    pub engine: EngineState,
    pub pending: usize,
    pub dropped: usize,
}

impl SyncStatus {
    /// One-line, user-facing description.
    pub fn summary(&self) -> String {
        let changes = match self.pending {
            1 => "1 pending change".to_string(),
            n => format!("{n} pending changes"),
        };
        match (self.pending, self.connectivity, self.engine) {
            (0, _, _) => "All changes synced".to_string(),
            (_, ConnectivityState::Offline, _) => format!("{changes} — will sync when online"),
            (_, ConnectivityState::Online, EngineState::Draining) => format!("Syncing {changes}"),
            (_, ConnectivityState::Online, EngineState::Idle) => format!("{changes} waiting to sync"),
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Cache, action queue and sync engine behind one handle.
pub struct OfflineSync<S, O, E, C = SystemClock>
where
    S: PersistentStore + 'static,
    O: NetworkObserver + 'static,
    E: RemoteActionExecutor + 'static,
    C: ClockSource,
{
    cache: CacheStore<S, C>,
    queue: Arc<ActionQueue<S>>,
    engine: Arc<SyncEngine<S, E>>,
    observer: Arc<O>,
    trigger: SyncTrigger,
    /// Taken by [`OfflineSync::start`].
    trigger_rx: Mutex<Option<mpsc::Receiver<()>>>,
    cancel_token: CancellationToken,
}

impl<S, O, E> OfflineSync<S, O, E, SystemClock>
where
    S: PersistentStore + 'static,
    O: NetworkObserver + 'static,
    E: RemoteActionExecutor + 'static,
{
    pub fn new(store: Arc<S>, observer: Arc<O>, executor: E, config: SyncConfig) -> Self {
        Self::with_clock(store, observer, executor, config, SystemClock)
    }
}

impl<S, O, E, C> OfflineSync<S, O, E, C>
where
    S: PersistentStore + 'static,
    O: NetworkObserver + 'static,
    E: RemoteActionExecutor + 'static,
    C: ClockSource,
{
    /// Creates the service with an explicit clock for cache expiry.
    pub fn with_clock(store: Arc<S>, observer: Arc<O>, executor: E, config: SyncConfig, clock: C) -> Self {
        let queue = Arc::new(ActionQueue::new(Arc::clone(&store)).with_max_attempts(config.max_attempts));
        let engine_config = EngineConfig { drop_permanent_rejections: config.drop_permanent_rejections };
        let engine = Arc::new(SyncEngine::new(Arc::clone(&queue), executor, engine_config));
        let (trigger, trigger_rx) = SyncTrigger::channel();

        OfflineSync {
            cache: CacheStore::with_clock(store, clock),
            queue,
            engine,
            observer,
            trigger,
            trigger_rx: Mutex::new(Some(trigger_rx)),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Reads a cached payload. Missing, expired and unreadable entries are misses.
    pub fn cache_get<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        self.cache.get(key)
    }

    pub fn cache_put<T: Serialize + ?Sized>(&self, key: &str, payload: &T, ttl: Duration) -> SyncResult<()> {
        self.cache.put(key, payload, ttl)?;
        Ok(())
    }

    /// Removes every cache entry. Queued actions are untouched.
    pub fn cache_clear(&self) -> SyncResult<usize> {
        Ok(self.cache.clear()?)
    }

    /// Records a change for later delivery.
    ///
    /// Returns `None` if the action could not be persisted; the change is
    /// lost and the failure is logged. When online, a drain is requested.
    pub fn enqueue_offline_action(&self, kind: ActionKind, payload: serde_json::Value) -> Option<ActionId> {
        match self.queue.enqueue(kind, payload) {
            Ok(id) => {
                if self.is_online() {
                    self.trigger.request();
                }
                Some(id)
            }
            Err(e) => {
                tracing::error!(%kind, error = %e, "offline action lost, could not persist it");
                None
            }
        }
    }

    /// Number of queued actions, 0 if the queue cannot be read.
    pub fn pending_action_count(&self) -> usize {
        self.queue.len().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "cannot read action queue");
            0
        })
    }

    /// Queued actions in delivery order, empty if the queue cannot be read.
    pub fn pending_actions(&self) -> Vec<OfflineAction> {
        self.queue.peek_all().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "cannot read action queue");
            Vec::new()
        })
    }

    /// Actions that were given up on, oldest first.
    pub fn dropped_actions(&self) -> Vec<DroppedAction> {
        self.queue.dropped().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "cannot read dropped actions");
            Vec::new()
        })
    }

    pub fn clear_dropped(&self) -> SyncResult<()> {
        Ok(self.queue.clear_dropped()?)
    }

    pub fn is_online(&self) -> bool {
        self.observer.current_state().is_online()
    }

    /// Asks the running engine for a drain. Ignored while offline.
    pub fn request_sync(&self) -> bool {
        self.trigger.request()
    }

    /// Runs one drain now, regardless of connectivity.
    ///
    /// Returns `None` if a drain was already running.
    pub async fn sync_now(&self) -> Option<DrainReport> {
        self.engine.drain().await
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            connectivity: self.observer.current_state(),
            engine: self.engine.state(),
            pending: self.pending_action_count(),
            dropped: self.dropped_actions().len(),
        }
    }

    /// Spawns the engine loop on the current tokio runtime.
    ///
    /// Returns `None` if it was already started.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        let triggers = self.trigger_rx.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(triggers) = triggers else {
            tracing::warn!("sync engine already started");
            return None;
        };

        let engine = Arc::clone(&self.engine);
        let observer = Arc::clone(&self.observer);
        let cancel_token = self.cancel_token.clone();
        Some(tokio::spawn(async move {
            engine.run(&*observer, triggers, cancel_token).await;
        }))
    }

    /// Stops the engine loop. An in-flight drain is abandoned; its current
    /// action stays queued.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl<S, O, E, C> Drop for OfflineSync<S, O, E, C>
where
    S: PersistentStore + 'static,
    O: NetworkObserver + 'static,
    E: RemoteActionExecutor + 'static,
    C: ClockSource,
{
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
