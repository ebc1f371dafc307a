// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity reporting.
//!
//! The observer is an external collaborator: the platform knows when the
//! device goes on or offline, tandem only consumes the transitions. Nothing
//! here debounces; the engine ignores repeated states itself.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Whether the remote service is believed reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityState {
    Online,
    Offline,
}

impl ConnectivityState {
    pub fn is_online(&self) -> bool {
        *self == ConnectivityState::Online
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityState::Online => f.write_str("online"),
            ConnectivityState::Offline => f.write_str("offline"),
        }
    }
}

/// Subscription to connectivity changes. Dropping it unsubscribes.
pub type ConnectivityWatch = watch::Receiver<ConnectivityState>;

/// Source of connectivity transitions.
pub trait NetworkObserver: Send + Sync {
    /// The state right now. Queried once at startup.
    fn current_state(&self) -> ConnectivityState;

    /// Subscribes to future transitions.
    fn subscribe(&self) -> ConnectivityWatch;
}

/// Observer driven by explicit calls.
///
/// Embedding applications forward their platform's connectivity callbacks
/// here; tests flip it directly.
pub struct ManualObserver {
    tx: watch::Sender<ConnectivityState>,
}

impl ManualObserver {
    pub fn new(initial: ConnectivityState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        ManualObserver { tx }
    }

    /// Publishes a state. Returns true if it differs from the previous one.
    pub fn set_state(&self, state: ConnectivityState) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        })
    }

    pub fn go_online(&self) -> bool {
        self.set_state(ConnectivityState::Online)
    }

    pub fn go_offline(&self) -> bool {
        self.set_state(ConnectivityState::Offline)
    }
}

impl NetworkObserver for ManualObserver {
    fn current_state(&self) -> ConnectivityState {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> ConnectivityWatch {
        self.tx.subscribe()
    }
}

impl<O: NetworkObserver + ?Sized> NetworkObserver for std::sync::Arc<O> {
    fn current_state(&self) -> ConnectivityState {
        (**self).current_state()
    }

    fn subscribe(&self) -> ConnectivityWatch {
        (**self).subscribe()
    }
}
