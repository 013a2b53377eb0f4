//! Typed - 型付き Command API
//!
//! command 名の typo を型で排除し、Handler との対応付けを静的に保証します。
//!
//! # 二層構造
//! - **表層（Typed）**: `Command` trait, `Handler<C>` trait - 型安全
//! - **内部（Dyn）**: `DynHandler` trait - object-safe, type erasure
//!
//! 失敗の生成は `convert` の変換 trait と `bail!` / `ensure!` マクロで行います。

pub mod codec;
pub mod command;
pub mod convert;
pub mod handler;
pub mod registry;

pub use self::codec::{CodecError, PayloadCodec};
pub use self::command::Command;
pub use self::convert::{CommandContext, IntoCommandResult, IntoEmptyCommandResult};
pub use self::handler::{DynHandler, FnHandler, Handler, TypedHandler, handler_fn};
pub use self::registry::{CommandRegistry, RegistryError};
