//! relay-core
//!
//! Caller と host の間で command を呼び出し、handler のどんな失敗も
//! 単一の構造化された形（[`FailureDescriptor`]）に正規化して返すブリッジ。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, request, outcome, state, errors）
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, DispatchStrategy）
//! - **app**: アプリケーションロジック（builder, host, invoker）
//! - **typed**: 型付き Command API（Command trait, Handler trait, CommandRegistry, PayloadCodec, 変換）
//! - **impls**: ports の実装（DirectDispatch）
//! - **config**: 設定の読み込みと検証
//! - **fixtures**: 6 つのプロトコル fixture command

pub mod app;
pub mod config;
pub mod domain;
pub mod fixtures;
pub mod impls;
pub mod ports;
pub mod typed;

// `bail!` / `ensure!` expand to `$crate::anyhow::anyhow!`.
pub use anyhow;

pub use crate::app::{BuildError, Host, HostBuilder, HostHandle, InvocationHandle, Invoker};
pub use crate::config::{ConfigError, RelayConfig};
pub use crate::domain::{
    CommandError, CommandName, CommandOutcome, CommandRequest, CommandResult, FailureDescriptor,
    FailureKind, InvocationId, InvocationState, MessageFormat, RenderOptions,
};
pub use crate::typed::{
    Command, CommandContext, CommandRegistry, Handler, IntoCommandResult, IntoEmptyCommandResult,
    handler_fn,
};
