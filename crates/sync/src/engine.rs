// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Drains the action queue against the remote.
//!
//! A drain walks a snapshot of the queue in creation order and hands each
//! action to the executor, one at a time. A failure is recorded on the
//! action and the pass moves on. At most one drain runs at a time; a
//! drain requested while another is running is a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use td_core::{ActionQueue, FailureOutcome, OfflineAction, PersistentStore};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;

use crate::executor::{ExecuteError, RemoteActionExecutor};
use crate::network::NetworkObserver;

/// Engine behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    /// Drop actions the remote refuses as invalid instead of retrying them.
    pub drop_permanent_rejections: bool,
}

/// Whether a drain is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Idle,
    Draining,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineState::Idle => f.write_str("idle"),
            EngineState::Draining => f.write_str("draining"),
        }
    }
}

/// Outcome counts of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Actions handed to the executor.
    pub attempted: usize,
    /// Confirmed by the remote and removed.
    pub succeeded: usize,
    /// Failed but kept for a later pass.
    pub retained: usize,
    /// Removed without delivery.
    pub dropped: usize,
}

/// Handle for requesting a drain from outside the run loop.
///
/// Requests made while one is already pending collapse into it.
#[derive(Debug, Clone)]
pub struct SyncTrigger {
    tx: mpsc::Sender<()>,
}

impl SyncTrigger {
    /// Creates a trigger and the receiver to hand to [`SyncEngine::run`].
    pub fn channel() -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        (SyncTrigger { tx }, rx)
    }

    /// Requests a drain. Returns false once the run loop is gone.
    pub fn request(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Closed(())) => false,
        }
    }
}

/// Releases the drain flag when dropped, including on cancellation.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Delivers queued actions when connectivity returns.
pub struct SyncEngine<S: PersistentStore, E: RemoteActionExecutor> {
    queue: Arc<ActionQueue<S>>,
    executor: E,
    config: EngineConfig,
    draining: AtomicBool,
}

impl<S: PersistentStore, E: RemoteActionExecutor> SyncEngine<S, E> {
    pub fn new(queue: Arc<ActionQueue<S>>, executor: E, config: EngineConfig) -> Self {
        SyncEngine { queue, executor, config, draining: AtomicBool::new(false) }
    }

    pub fn state(&self) -> EngineState {
        if self.draining.load(Ordering::Acquire) {
            EngineState::Draining
        } else {
            EngineState::Idle
        }
    }

    pub fn queue(&self) -> &Arc<ActionQueue<S>> {
        &self.queue
    }

    /// Runs one pass over the queue.
    ///
    /// Returns `None` without doing anything if a drain is already running.
    pub async fn drain(&self) -> Option<DrainReport> {
        let _guard = self.try_begin()?;
        let mut report = DrainReport::default();

        let snapshot = match self.queue.peek_all() {
            Ok(actions) => actions,
            Err(e) => {
                tracing::warn!(error = %e, "cannot read action queue, skipping drain");
                return Some(report);
            }
        };
        if snapshot.is_empty() {
            return Some(report);
        }

        tracing::debug!(pending = snapshot.len(), "drain started");
        for action in &snapshot {
            report.attempted += 1;
            match self.executor.execute(action).await {
                Ok(()) => self.record_success(action, &mut report),
                Err(err) => self.record_failure(action, &err, &mut report),
            }
        }

        tracing::info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            retained = report.retained,
            dropped = report.dropped,
            "drain finished"
        );
        Some(report)
    }

    /// Drives the engine until `cancel` fires.
    ///
    /// Drains once at startup when already online with work queued, then on
    /// every transition into Online and on every trigger received while
    /// online. A trigger sent during a drain stays buffered and causes one
    /// more pass, which picks up actions enqueued after the snapshot.
    pub async fn run<O: NetworkObserver + ?Sized>(
        &self,
        observer: &O,
        mut triggers: mpsc::Receiver<()>,
        cancel: CancellationToken,
    ) {
        let mut connectivity = observer.subscribe();
        let mut last = observer.current_state();
        let _ = connectivity.borrow_and_update();
        tracing::debug!(state = %last, "sync engine started");

        if last.is_online() && !self.queue.is_empty().unwrap_or(false) && self.drain_or_cancel(&cancel).await {
            return;
        }

        let mut observer_open = true;
        let mut triggers_open = true;
        loop {
            let should_drain = tokio::select! {
                _ = cancel.cancelled() => break,
                changed = connectivity.changed(), if observer_open => {
                    if changed.is_err() {
                        tracing::debug!("connectivity observer closed");
                        observer_open = false;
                        false
                    } else {
                        // Publishers only notify on a real change, so Online
                        // after Online means a flap collapsed by the channel.
                        let state = *connectivity.borrow_and_update();
                        tracing::debug!(from = %last, to = %state, "connectivity changed");
                        last = state;
                        state.is_online()
                    }
                }
                msg = triggers.recv(), if triggers_open => match msg {
                    Some(()) if last.is_online() => true,
                    Some(()) => {
                        tracing::debug!("sync requested while offline, ignoring");
                        false
                    }
                    None => {
                        triggers_open = false;
                        false
                    }
                },
            };

            if should_drain && self.drain_or_cancel(&cancel).await {
                break;
            }
        }
        tracing::debug!("sync engine stopped");
    }

    /// Drains unless cancelled first. Returns true if cancelled.
    async fn drain_or_cancel(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => true,
            report = self.drain() => {
                if report.is_none() {
                    tracing::debug!("drain already running, request coalesced");
                }
                false
            }
        }
    }

    fn try_begin(&self) -> Option<DrainGuard<'_>> {
        self.draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| DrainGuard(&self.draining))
    }

    fn record_success(&self, action: &OfflineAction, report: &mut DrainReport) {
        match self.queue.mark_succeeded(&action.id) {
            Ok(true) => {
                tracing::debug!(id = %action.id, kind = %action.kind, "action delivered");
                report.succeeded += 1;
            }
            Ok(false) => {
                tracing::debug!(id = %action.id, "delivered action already left the queue");
                report.succeeded += 1;
            }
            // Stays queued; the remote must dedupe the resend by id
            Err(e) => tracing::warn!(id = %action.id, error = %e, "cannot remove delivered action"),
        }
    }

    fn record_failure(&self, action: &OfflineAction, err: &ExecuteError, report: &mut DrainReport) {
        let reason = err.to_string();

        if self.config.drop_permanent_rejections && !err.is_retryable() {
            match self.queue.mark_rejected(&action.id, &reason) {
                Ok(Some(_)) => report.dropped += 1,
                Ok(None) => {}
                Err(e) => tracing::warn!(id = %action.id, error = %e, "cannot drop rejected action"),
            }
            return;
        }

        match self.queue.mark_failed(&action.id, &reason) {
            Ok(FailureOutcome::Retained { attempts }) => {
                tracing::debug!(id = %action.id, attempts, error = %reason, "action failed, will retry");
                report.retained += 1;
            }
            Ok(FailureOutcome::Dropped(_)) => report.dropped += 1,
            Ok(FailureOutcome::NotFound) => {
                tracing::debug!(id = %action.id, "failed action already left the queue");
            }
            Err(e) => tracing::warn!(id = %action.id, error = %e, "cannot record failed attempt"),
        }
    }
}
