//! Errors - handler 側のエラー型
//!
//! handler は `anyhow::Error` を自由に使い、境界を越える直前に
//! [`CommandError`] へ変換します。`CommandError` は「どうやって失敗したか」
//! ([`FailureKind`]) を一緒に持ち運び、最終的に [`FailureDescriptor`] へ
//! 正規化されます。

use std::fmt;

use serde::{Deserialize, Serialize};

use super::outcome::{FailureDescriptor, FailureKind};

/// Result type returned by command handlers.
pub type CommandResult<T> = Result<T, CommandError>;

/// How a failure message is rendered from an error chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFormat {
    /// `outer: inner: root` (anyhow's alternate format).
    #[default]
    Chain,
    /// Only the outermost message.
    Outermost,
}

/// Controls how [`CommandError`]s are normalized into descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: MessageFormat,
    pub preserve_cause_chain: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: MessageFormat::Chain,
            preserve_cause_chain: true,
        }
    }
}

/// Error returned by a command handler.
///
/// `?` on an `anyhow::Error` yields [`FailureKind::Thrown`]; the other kinds
/// come from the explicit conversions in [`crate::typed::convert`] and from
/// the `bail!` / `ensure!` macros.
#[derive(Debug)]
pub struct CommandError {
    kind: FailureKind,
    error: anyhow::Error,
}

impl CommandError {
    pub fn new(kind: FailureKind, error: impl Into<anyhow::Error>) -> Self {
        Self {
            kind,
            error: error.into(),
        }
    }

    pub fn thrown(error: impl Into<anyhow::Error>) -> Self {
        Self::new(FailureKind::Thrown, error)
    }

    pub fn context_wrapped(error: impl Into<anyhow::Error>) -> Self {
        Self::new(FailureKind::ContextWrapped, error)
    }

    pub fn bailed(error: impl Into<anyhow::Error>) -> Self {
        Self::new(FailureKind::Bailed, error)
    }

    pub fn ensured(error: impl Into<anyhow::Error>) -> Self {
        Self::new(FailureKind::Ensured, error)
    }

    pub fn pure_converted(error: impl Into<anyhow::Error>) -> Self {
        Self::new(FailureKind::PureConverted, error)
    }

    pub fn invalid_payload(error: impl Into<anyhow::Error>) -> Self {
        Self::new(FailureKind::InvalidPayload, error)
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn inner(&self) -> &anyhow::Error {
        &self.error
    }

    pub fn into_inner(self) -> anyhow::Error {
        self.error
    }

    /// Normalizes into the caller-visible shape.
    ///
    /// Each link below the outermost becomes a nested `cause` with the same
    /// kind, rendered with its own message only.
    pub fn describe(&self, options: RenderOptions) -> FailureDescriptor {
        let message = match options.format {
            MessageFormat::Chain => format!("{:#}", self.error),
            MessageFormat::Outermost => self.error.to_string(),
        };
        let mut descriptor = FailureDescriptor::new(self.kind, message);

        if options.preserve_cause_chain {
            let links: Vec<String> = self.error.chain().skip(1).map(|e| e.to_string()).collect();
            descriptor.cause = links.into_iter().rev().fold(None, |inner, message| {
                Some(Box::new(FailureDescriptor {
                    kind: self.kind,
                    message,
                    cause: inner,
                }))
            });
        }

        descriptor
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)
    }
}

impl std::error::Error for CommandError {}

impl From<anyhow::Error> for CommandError {
    fn from(error: anyhow::Error) -> Self {
        Self::thrown(error)
    }
}

impl From<CommandError> for FailureDescriptor {
    fn from(error: CommandError) -> Self {
        error.describe(RenderOptions::default())
    }
}

/// Serializes as the rendered message, the same string a caller sees in
/// `FailureDescriptor::message` with the default options.
impl Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:#}", self.error))
    }
}
