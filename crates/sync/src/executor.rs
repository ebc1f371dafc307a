// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote execution of queued actions.
//!
//! Provides a trait-based seam between the engine and the network that enables:
//! - Real HTTP delivery in production ([`HttpExecutor`](crate::HttpExecutor))
//! - Scripted executors for unit testing

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use td_core::OfflineAction;

/// Error type for executor calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    /// The request never got a response.
    #[error("network error: {0}")]
    Network(String),

    /// No response within the call's deadline.
    #[error("request timed out")]
    Timeout,

    /// The remote answered with a retryable failure (5xx, 408, 429).
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The remote refused the request as invalid; retrying will not help.
    #[error("rejected {status}: {message}")]
    Rejected { status: u16, message: String },
}

impl ExecuteError {
    /// Classifies a non-2xx HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            408 | 429 => ExecuteError::Server { status, message },
            400..=499 => ExecuteError::Rejected { status, message },
            _ => ExecuteError::Server { status, message },
        }
    }

    /// False only for permanent rejections.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ExecuteError::Rejected { .. })
    }
}

/// Result type for executor calls.
pub type ExecuteResult<T> = Result<T, ExecuteError>;

/// Performs the network mutation for one action.
///
/// Implementations must be idempotent keyed by the action id: a call may
/// appear to fail locally after it succeeded remotely (response lost), and
/// the engine will send the same action again.
pub trait RemoteActionExecutor: Send + Sync {
    /// Delivers the action. `Ok` only on confirmed success.
    fn execute<'a>(
        &'a self,
        action: &'a OfflineAction,
    ) -> Pin<Box<dyn Future<Output = ExecuteResult<()>> + Send + 'a>>;
}

impl<E: RemoteActionExecutor + ?Sized> RemoteActionExecutor for Arc<E> {
    fn execute<'a>(
        &'a self,
        action: &'a OfflineAction,
    ) -> Pin<Box<dyn Future<Output = ExecuteResult<()>> + Send + 'a>> {
        (**self).execute(action)
    }
}
