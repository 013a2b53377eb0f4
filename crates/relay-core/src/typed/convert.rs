//! Conversions from `anyhow` into [`CommandResult`].
//!
//! Every conversion is explicit and total. The kind recorded on the
//! resulting [`CommandError`] tells which path produced it:
//!
//! | path | kind |
//! |---|---|
//! | `?` on `anyhow::Result` | `Thrown` |
//! | `Result::into_command_result()` | `ContextWrapped` |
//! | `Result::command_context(..)` | `ContextWrapped` |
//! | `anyhow::Error::into_command_result()` | `PureConverted` |
//! | [`bail!`](crate::bail) | `Bailed` |
//! | [`ensure!`](crate::ensure) | `Ensured` |

use std::fmt::Display;

use crate::domain::{CommandError, CommandResult};

pub trait IntoCommandResult<T> {
    fn into_command_result(self) -> CommandResult<T>;
}

/// An `Ok` passes through untouched.
impl<T, E> IntoCommandResult<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn into_command_result(self) -> CommandResult<T> {
        self.map_err(CommandError::context_wrapped)
    }
}

impl<T> IntoCommandResult<T> for anyhow::Error {
    fn into_command_result(self) -> CommandResult<T> {
        Err(CommandError::pure_converted(self))
    }
}

/// `IntoCommandResult` with the success type pinned to `()`.
pub trait IntoEmptyCommandResult {
    fn into_empty_command_result(self) -> CommandResult<()>;
}

impl IntoEmptyCommandResult for anyhow::Error {
    fn into_empty_command_result(self) -> CommandResult<()> {
        Err(CommandError::pure_converted(self))
    }
}

/// Attaches a context message while converting.
pub trait CommandContext<T> {
    fn command_context<C>(self, context: C) -> CommandResult<T>
    where
        C: Display + Send + Sync + 'static;

    fn with_command_context<C, F>(self, f: F) -> CommandResult<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> CommandContext<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn command_context<C>(self, context: C) -> CommandResult<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| CommandError::context_wrapped(Into::<anyhow::Error>::into(e).context(context)))
    }

    fn with_command_context<C, F>(self, f: F) -> CommandResult<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| CommandError::context_wrapped(Into::<anyhow::Error>::into(e).context(f())))
    }
}

/// Returns early with a [`Bailed`](crate::domain::FailureKind::Bailed) error.
///
/// Accepts the same forms as `anyhow::bail!`.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return ::core::result::Result::Err($crate::CommandError::bailed($crate::anyhow::anyhow!($msg)))
    };
    ($err:expr $(,)?) => {
        return ::core::result::Result::Err($crate::CommandError::bailed($crate::anyhow::anyhow!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return ::core::result::Result::Err($crate::CommandError::bailed($crate::anyhow::anyhow!($fmt, $($arg)*)))
    };
}

/// Returns early with an [`Ensured`](crate::domain::FailureKind::Ensured)
/// error unless the condition holds.
///
/// Without a message the error reads ``Condition failed: `cond` ``.
#[macro_export]
macro_rules! ensure {
    ($cond:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::CommandError::ensured($crate::anyhow::anyhow!(
                ::core::concat!("Condition failed: `", ::core::stringify!($cond), "`")
            )));
        }
    };
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::CommandError::ensured($crate::anyhow::anyhow!($msg)));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::CommandError::ensured($crate::anyhow::anyhow!($err)));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return ::core::result::Result::Err($crate::CommandError::ensured($crate::anyhow::anyhow!($fmt, $($arg)*)));
        }
    };
}
