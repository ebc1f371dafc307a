// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP delivery of offline actions.
//!
//! Each action is POSTed as JSON to the endpoint for its kind, with the
//! action id in an `Idempotency-Key` header so the server can discard
//! duplicates of a retried request.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;
use td_core::{ActionKind, OfflineAction};
use url::Url;

use crate::executor::{ExecuteError, ExecuteResult, RemoteActionExecutor};

/// Header carrying the action id.
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 200;

/// Relative endpoint path for each action kind.
pub fn endpoint_for(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::UpdateProgress => "progress",
        ActionKind::CompleteStep => "steps/complete",
        ActionKind::RecordPronunciationScore => "pronunciation/scores",
    }
}

/// Configuration for the HTTP executor.
#[derive(Debug, Clone)]
pub struct HttpExecutorConfig {
    /// Base URL; endpoints are resolved relative to it.
    pub base_url: String,
    /// Per-request deadline.
    pub timeout: Duration,
    /// Bearer token, if the remote requires one.
    pub auth_token: Option<String>,
}

impl Default for HttpExecutorConfig {
    fn default() -> Self {
        HttpExecutorConfig {
            base_url: "http://localhost:8080/api/v1/".to_string(),
            timeout: Duration::from_secs(10),
            auth_token: None,
        }
    }
}

/// Error building an [`HttpExecutor`].
#[derive(Debug, thiserror::Error)]
pub enum HttpSetupError {
    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported url scheme '{0}'\n  hint: use http:// or https://")]
    UnsupportedScheme(String),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Executor posting actions to a REST backend.
pub struct HttpExecutor {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpExecutor {
    pub fn new(config: HttpExecutorConfig) -> Result<Self, HttpSetupError> {
        let mut base_url = Url::parse(&config.base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(HttpSetupError::UnsupportedScheme(base_url.scheme().to_string()));
        }
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(HttpExecutor { client, base_url, auth_token: config.auth_token })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, kind: ActionKind) -> ExecuteResult<Url> {
        self.base_url.join(endpoint_for(kind)).map_err(|e| ExecuteError::Network(e.to_string()))
    }
}

impl RemoteActionExecutor for HttpExecutor {
    fn execute<'a>(
        &'a self,
        action: &'a OfflineAction,
    ) -> Pin<Box<dyn Future<Output = ExecuteResult<()>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.url_for(action.kind)?;

            let mut request = self
                .client
                .post(url)
                .header(IDEMPOTENCY_HEADER, action.id.as_str())
                .json(&action.payload);
            if let Some(token) = &self.auth_token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await.map_err(classify)?;
            let status = response.status();
            if status.is_success() {
                return Ok(());
            }

            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY).rev().find(|i| message.is_char_boundary(*i)).unwrap_or(0);
                message.truncate(cut);
            }
            Err(ExecuteError::from_status(status.as_u16(), message))
        })
    }
}

fn classify(err: reqwest::Error) -> ExecuteError {
    if err.is_timeout() {
        ExecuteError::Timeout
    } else {
        ExecuteError::Network(err.to_string())
    }
}
