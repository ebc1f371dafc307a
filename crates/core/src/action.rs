// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending mutation records held by the [`ActionQueue`](crate::ActionQueue).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of state-mutating request, mapped to a remote endpoint by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Lesson progress changed (percentage, last position).
    UpdateProgress,
    /// A lesson step was completed.
    CompleteStep,
    /// A pronunciation exercise was scored.
    RecordPronunciationScore,
}

impl ActionKind {
    /// Every kind, in declaration order.
    pub const ALL: [ActionKind; 3] = [
        ActionKind::UpdateProgress,
        ActionKind::CompleteStep,
        ActionKind::RecordPronunciationScore,
    ];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::UpdateProgress => "update_progress",
            ActionKind::CompleteStep => "complete_step",
            ActionKind::RecordPronunciationScore => "record_pronunciation_score",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown action kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid action kind: '{0}'\n  hint: valid kinds are: update_progress, complete_step, record_pronunciation_score")]
pub struct ParseKindError(pub String);

impl FromStr for ActionKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "update_progress" => Ok(ActionKind::UpdateProgress),
            "complete_step" => Ok(ActionKind::CompleteStep),
            "record_pronunciation_score" => Ok(ActionKind::RecordPronunciationScore),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

/// Unique identifier of a queued action.
///
/// Doubles as the idempotency key sent to the remote service, so retries of
/// the same action never duplicate server-side effects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    /// Generates a fresh random (v4 UUID) identifier.
    pub fn generate() -> Self {
        ActionId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        ActionId(s.to_string())
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        ActionId(s)
    }
}

/// A mutation waiting for delivery to the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineAction {
    pub id: ActionId,
    pub kind: ActionKind,
    /// Opaque request body, passed through to the executor untouched.
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    /// Failed delivery attempts so far. Never decreases.
    #[serde(default)]
    pub attempts: u32,
    /// Message of the most recent failed attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl OfflineAction {
    /// Creates a new action with a fresh id and zero attempts.
    pub fn new(kind: ActionKind, payload: serde_json::Value) -> Self {
        OfflineAction {
            id: ActionId::generate(),
            kind,
            payload,
            created_at: Utc::now(),
            attempts: 0,
            last_error: None,
        }
    }
}

/// Why an action left the queue without being delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Failed `max_attempts` times.
    RetriesExhausted,
    /// The remote refused it as permanently invalid.
    Rejected,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::RetriesExhausted => "retries_exhausted",
            DropReason::Rejected => "rejected",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An undeliverable action, kept so the loss can be shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedAction {
    pub action: OfflineAction,
    pub reason: DropReason,
    pub dropped_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
