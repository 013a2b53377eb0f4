//! Handler trait - Command を実行する Handler の定義
//!
//! # 学習ポイント
//! - ジェネリック trait (Handler<C>)
//! - Object-safe trait (DynHandler)
//! - Type erasure パターン (TypedHandler<C, H> → DynHandler)

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::Value;

use super::codec::PayloadCodec;
use super::command::Command;
use crate::domain::{CommandError, CommandResult};

/// Handler は Command の引数を受け取り、成功値か [`CommandError`] を返す
///
/// # 使用例
/// ```ignore
/// struct GreetHandler;
///
/// #[async_trait]
/// impl Handler<Greet> for GreetHandler {
///     async fn handle(&self, args: GreetArgs) -> CommandResult<String> {
///         ensure!(!args.name.is_empty(), "name must not be empty");
///         Ok(format!("hello, {}", args.name))
///     }
/// }
/// ```
#[async_trait]
pub trait Handler<C: Command>: Send + Sync {
    async fn handle(&self, args: C::Args) -> CommandResult<C::Output>;
}

/// DynHandler は object-safe な Handler の抽象化
///
/// 引数と戻り値は `serde_json::Value` に消去されるので、
/// `HashMap<String, Arc<dyn DynHandler>>` に格納できます。
#[async_trait]
pub trait DynHandler: Send + Sync {
    async fn handle_dyn(&self, payload: Option<Value>) -> CommandResult<Value>;

    fn command_name(&self) -> &'static str;
}

pub struct TypedHandler<C: Command, H: Handler<C>> {
    handler: H,
    _marker: PhantomData<C>,
}

impl<C: Command, H: Handler<C>> TypedHandler<C, H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<C: Command, H: Handler<C>> DynHandler for TypedHandler<C, H> {
    async fn handle_dyn(&self, payload: Option<Value>) -> CommandResult<Value> {
        let args = PayloadCodec::decode_args::<C>(payload).map_err(CommandError::invalid_payload)?;
        let output = self.handler.handle(args).await?;
        PayloadCodec::encode_output::<C>(&output).map_err(CommandError::invalid_payload)
    }

    fn command_name(&self) -> &'static str {
        C::NAME
    }
}

/// Adapts an async function into a [`Handler`].
///
/// ```ignore
/// async fn ping(_: ()) -> CommandResult<String> {
///     Ok("pong".into())
/// }
///
/// registry.register::<Ping, _>(handler_fn(ping))?;
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F> {
    FnHandler { f }
}

pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<C, F, Fut> Handler<C> for FnHandler<F>
where
    C: Command,
    F: Fn(C::Args) -> Fut + Send + Sync,
    Fut: Future<Output = CommandResult<C::Output>> + Send + 'static,
{
    async fn handle(&self, args: C::Args) -> CommandResult<C::Output> {
        (self.f)(args).await
    }
}
