// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnection-driven delivery of offline actions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  transitions  ┌──────────────┐  execute   ┌──────────────┐
//! │   Network    │──────────────►│  SyncEngine  │───────────►│   Executor   │
//! │  Observer    │               │ (Idle/Drain) │◄───────────│   (trait)    │
//! └──────────────┘               └──────────────┘   result   └──────────────┘
//!                                       │
//!                                       ▼
//!                                ┌──────────────┐
//!                                │ ActionQueue  │  (td-core)
//!                                └──────────────┘
//! ```
//!
//! [`OfflineSync`] bundles the cache, the queue and the engine behind the
//! handful of calls the rest of an application needs.

mod engine;
mod executor;
mod http;
mod network;
mod probe;
mod service;

pub use engine::{DrainReport, EngineConfig, EngineState, SyncEngine, SyncTrigger};
pub use executor::{ExecuteError, ExecuteResult, RemoteActionExecutor};
pub use http::{endpoint_for, HttpExecutor, HttpExecutorConfig, HttpSetupError, IDEMPOTENCY_HEADER};
pub use network::{ConnectivityState, ConnectivityWatch, ManualObserver, NetworkObserver};
pub use probe::{ProbeConfig, ReachabilityProbe};
pub use service::{OfflineSync, SyncConfig, SyncError, SyncResult, SyncStatus};

#[cfg(test)]
mod test_helpers;
