//! Outcome model: the single result shape every invocation collapses into.
//!
//! However a command fails on the host side (a propagated error, a panic, a
//! `bail!`, a violated `ensure!`, a converted error value), the caller only
//! ever sees a [`CommandOutcome`]. Callers may rely on
//! [`FailureDescriptor::message`] being present and human-readable; `kind`
//! and `cause` are diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::request::CommandName;
use super::state::InvocationState;

/// How a failure was produced.
///
/// Serialized as snake_case (`"thrown"`, `"unrecognized_command"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// An error propagated out of the handler with `?`, or a panic.
    Thrown,
    /// A generic error result converted with added or implied context.
    ContextWrapped,
    /// Early return through `bail!`.
    Bailed,
    /// A violated `ensure!` precondition.
    Ensured,
    /// An error value converted directly into the failure type.
    PureConverted,
    /// No handler is registered under the requested name.
    UnrecognizedCommand,
    /// Arguments or the response could not be (de)serialized.
    InvalidPayload,
    /// The host is gone; the request can never be answered.
    HostUnavailable,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Thrown => "thrown",
            FailureKind::ContextWrapped => "context_wrapped",
            FailureKind::Bailed => "bailed",
            FailureKind::Ensured => "ensured",
            FailureKind::PureConverted => "pure_converted",
            FailureKind::UnrecognizedCommand => "unrecognized_command",
            FailureKind::InvalidPayload => "invalid_payload",
            FailureKind::HostUnavailable => "host_unavailable",
        }
    }

    /// Kinds produced by the bridge itself rather than by a handler.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            FailureKind::UnrecognizedCommand
                | FailureKind::InvalidPayload
                | FailureKind::HostUnavailable
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-visible representation of any failure.
///
/// Wire shape: `{"kind": "...", "message": "...", "cause": {...}}`, `cause`
/// omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct FailureDescriptor {
    pub kind: FailureKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<FailureDescriptor>>,
}

impl FailureDescriptor {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: FailureDescriptor) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn unrecognized_command(name: &CommandName) -> Self {
        Self::new(
            FailureKind::UnrecognizedCommand,
            format!("command `{name}` is not registered"),
        )
    }

    pub fn host_unavailable(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::HostUnavailable, detail)
    }

    pub fn invalid_payload(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidPayload, detail)
    }

    /// Walks the nested causes, outermost first (excluding `self`).
    pub fn causes(&self) -> impl Iterator<Item = &FailureDescriptor> {
        std::iter::successors(self.cause.as_deref(), |c| c.cause.as_deref())
    }
}

/// The tagged result of one invocation.
///
/// Wire shape: `{"status": "success", "value": ...}` or
/// `{"status": "failure", "error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandOutcome {
    Success { value: serde_json::Value },
    Failure { error: FailureDescriptor },
}

impl CommandOutcome {
    pub fn success(value: serde_json::Value) -> Self {
        Self::Success { value }
    }

    pub fn failure(error: FailureDescriptor) -> Self {
        Self::Failure { error }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Terminal state this outcome puts the invocation in.
    pub fn state(&self) -> InvocationState {
        match self {
            Self::Success { .. } => InvocationState::Succeeded,
            Self::Failure { .. } => InvocationState::Failed,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error.kind),
        }
    }

    pub fn into_result(self) -> Result<serde_json::Value, FailureDescriptor> {
        match self {
            Self::Success { value } => Ok(value),
            Self::Failure { error } => Err(error),
        }
    }
}

impl From<Result<serde_json::Value, FailureDescriptor>> for CommandOutcome {
    fn from(result: Result<serde_json::Value, FailureDescriptor>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(error) => Self::failure(error),
        }
    }
}
