//! HostBuilder - host の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 開発体験の改善（明確なエラーメッセージ）

use std::sync::Arc;

use super::host::Host;
use crate::config::{ConfigError, RelayConfig};
use crate::impls::DirectDispatch;
use crate::ports::{Clock, DispatchStrategy, SystemClock};
use crate::typed::{Command, CommandRegistry, Handler, RegistryError};

/// HostBuilder は Host を構築
///
/// # 使用例
/// ```ignore
/// let host = HostBuilder::new()
///     .register::<Greet, _>(GreetHandler)?
///     .expect_commands(&["greet"])
///     .build()?;
/// let (invoker, handle) = host.spawn();
/// ```
///
/// # Fail-fast 設計
/// - expect_commands() で期待される command 名を登録
/// - build() 時に「期待集合 ⊆ 登録済み集合」をチェック
/// - 不足があれば BuildError を返す
pub struct HostBuilder {
    registry: CommandRegistry,
    expected_commands: Option<Vec<String>>,
    config: RelayConfig,
    dispatch: Arc<dyn DispatchStrategy>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing commands: {0:?}. These commands were expected but not registered.")]
    MissingCommands(Vec<String>),

    #[error("invalid host configuration")]
    Config(#[from] ConfigError),
}

impl HostBuilder {
    pub fn new() -> Self {
        Self {
            registry: CommandRegistry::new(),
            expected_commands: None,
            config: RelayConfig::default(),
            dispatch: Arc::new(DirectDispatch::new()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn register<C: Command, H: Handler<C> + 'static>(
        mut self,
        handler: H,
    ) -> Result<Self, RegistryError> {
        self.registry.register::<C, H>(handler)?;
        Ok(self)
    }

    /// Registers through a closure that has direct access to the registry.
    pub fn register_with<F>(mut self, f: F) -> Result<Self, RegistryError>
    where
        F: FnOnce(&mut CommandRegistry) -> Result<(), RegistryError>,
    {
        f(&mut self.registry)?;
        Ok(self)
    }

    pub fn expect_commands(mut self, names: &[&str]) -> Self {
        self.expected_commands = Some(names.iter().map(|name| name.to_string()).collect());
        self
    }

    pub fn with_config(mut self, config: RelayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_dispatch<D: DispatchStrategy + 'static>(mut self, dispatch: D) -> Self {
        self.dispatch = Arc::new(dispatch);
        self
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// # 検証
    /// - config が妥当か
    /// - expect_commands() の command が全て登録されているか
    pub fn build(self) -> Result<Host, BuildError> {
        self.config.validate()?;

        if let Some(expected) = &self.expected_commands {
            let missing: Vec<String> = expected
                .iter()
                .filter(|name| !self.registry.contains(name))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingCommands(missing));
            }
        }

        Ok(Host::new(
            self.registry,
            self.dispatch,
            self.clock,
            self.config.render_options(),
            self.config.channel_capacity,
        ))
    }
}

impl Default for HostBuilder {
    fn default() -> Self {
        Self::new()
    }
}
