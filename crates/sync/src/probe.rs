// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background reachability probing.
//!
//! When no platform connectivity callbacks are available (the CLI `watch`
//! command), a periodic TCP connect to the remote host stands in for them.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::network::{ConnectivityState, ConnectivityWatch, NetworkObserver};

/// Configuration for the reachability probe.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// `host:port` to connect to.
    pub address: String,
    /// Delay between probes.
    pub interval: Duration,
    /// Deadline for a single connect.
    pub timeout: Duration,
}

impl ProbeConfig {
    /// Targets the host and port of a remote base URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(base_url)?;
        let host = url.host_str().ok_or(url::ParseError::EmptyHost)?;
        let port = url.port_or_known_default().ok_or(url::ParseError::InvalidPort)?;
        // host_str keeps the brackets around IPv6 literals
        Ok(ProbeConfig { address: format!("{host}:{port}"), ..ProbeConfig::default() })
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            address: "localhost:8080".to_string(),
            interval: Duration::from_secs(15),
            timeout: Duration::from_millis(2000),
        }
    }
}

/// Observer fed by periodic TCP connects.
///
/// Starts Offline until the first probe completes.
pub struct ReachabilityProbe {
    config: ProbeConfig,
    tx: Arc<watch::Sender<ConnectivityState>>,
    cancel_token: CancellationToken,
}

impl ReachabilityProbe {
    pub fn new(config: ProbeConfig) -> Self {
        let (tx, _rx) = watch::channel(ConnectivityState::Offline);
        ReachabilityProbe {
            config,
            tx: Arc::new(tx),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Spawns the probe loop. It runs until [`cancel`](Self::cancel).
    pub fn spawn(&self) -> JoinHandle<()> {
        let config = self.config.clone();
        let tx = Arc::clone(&self.tx);
        let cancel_token = self.cancel_token.clone();

        tokio::spawn(async move {
            probe_loop(config, tx, cancel_token).await;
        })
    }

    /// Stops the probe loop.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Attempts one TCP connect within `timeout`.
    pub async fn probe_once(address: &str, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, TcpStream::connect(address)).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                tracing::debug!(address, error = %e, "probe connect failed");
                false
            }
            Err(_) => {
                tracing::debug!(address, "probe connect timed out");
                false
            }
        }
    }
}

impl NetworkObserver for ReachabilityProbe {
    fn current_state(&self) -> ConnectivityState {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> ConnectivityWatch {
        self.tx.subscribe()
    }
}

impl Drop for ReachabilityProbe {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn probe_loop(
    config: ProbeConfig,
    tx: Arc<watch::Sender<ConnectivityState>>,
    cancel_token: CancellationToken,
) {
    loop {
        let reachable = tokio::select! {
            _ = cancel_token.cancelled() => return,
            reachable = ReachabilityProbe::probe_once(&config.address, config.timeout) => reachable,
        };

        let state = if reachable { ConnectivityState::Online } else { ConnectivityState::Offline };
        let changed = tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
        if changed {
            tracing::info!(address = %config.address, %state, "connectivity changed");
        }

        tokio::select! {
            _ = cancel_token.cancelled() => return,
            _ = tokio::time::sleep(config.interval) => {}
        }
    }
}
