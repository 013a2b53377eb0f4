//! PayloadCodec - 境界を越える値のエンコード／デコード
//!
//! # フロー
//! 1. caller: `C::Args` → `serde_json::Value`（引数なしなら `None`）
//! 2. host: `Value` → `C::Args` → handler → `C::Output` → `Value`
//! 3. host: `CommandOutcome` → bytes（応答チャネルへ）
//! 4. caller: bytes → `CommandOutcome` → `C::Output`

use serde_json::Value;

use super::command::Command;
use crate::domain::{CommandOutcome, FailureDescriptor};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid arguments for `{command}`")]
    Args {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode the output of `{command}`")]
    Output {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode the outcome")]
    EncodeOutcome(#[source] serde_json::Error),

    #[error("malformed outcome received from the host")]
    DecodeOutcome(#[source] serde_json::Error),
}

impl From<CodecError> for FailureDescriptor {
    fn from(err: CodecError) -> Self {
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        let message = match source {
            Some(source) => format!("{err}: {source}"),
            None => err.to_string(),
        };
        FailureDescriptor::invalid_payload(message)
    }
}

/// Stateless JSON codec shared by the caller and the host.
pub struct PayloadCodec;

impl PayloadCodec {
    /// Absent arguments decode as JSON `null`, which is what `()` expects.
    pub fn decode_args<C: Command>(payload: Option<Value>) -> Result<C::Args, CodecError> {
        serde_json::from_value(payload.unwrap_or(Value::Null)).map_err(|source| {
            CodecError::Args {
                command: C::NAME,
                source,
            }
        })
    }

    pub fn encode_args<C: Command>(args: &C::Args) -> Result<Option<Value>, CodecError> {
        let value = serde_json::to_value(args).map_err(|source| CodecError::Args {
            command: C::NAME,
            source,
        })?;
        Ok(match value {
            Value::Null => None,
            value => Some(value),
        })
    }

    pub fn encode_output<C: Command>(output: &C::Output) -> Result<Value, CodecError> {
        serde_json::to_value(output).map_err(|source| CodecError::Output {
            command: C::NAME,
            source,
        })
    }

    pub fn decode_output<C: Command>(value: Value) -> Result<C::Output, CodecError> {
        serde_json::from_value(value).map_err(|source| CodecError::Output {
            command: C::NAME,
            source,
        })
    }

    pub fn encode_outcome(outcome: &CommandOutcome) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(outcome).map_err(CodecError::EncodeOutcome)
    }

    pub fn decode_outcome(bytes: &[u8]) -> Result<CommandOutcome, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::DecodeOutcome)
    }
}
