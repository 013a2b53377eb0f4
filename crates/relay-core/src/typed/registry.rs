//! CommandRegistry - Handler の登録と管理
//!
//! # 学習ポイント
//! - HashMap での型消去された trait object の管理
//! - Generic methods での登録と型安全性
//! - Arc による共有所有権（host の各タスクから参照される）

use std::collections::HashMap;
use std::sync::Arc;

use super::command::Command;
use super::handler::{DynHandler, Handler, TypedHandler};

/// CommandRegistry は command 名から Handler を引くテーブル
///
/// # 使用例
/// ```ignore
/// let mut registry = CommandRegistry::new();
/// registry.register::<Greet, _>(GreetHandler)?;
///
/// let handler = registry.get("greet");
/// ```
///
/// 構築時にだけ変更し、host に渡した後は読み取り専用です。
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn DynHandler>>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("handler for command '{0}' is already registered")]
    AlreadyRegistered(String),
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C: Command, H: Handler<C> + 'static>(
        &mut self,
        handler: H,
    ) -> Result<(), RegistryError> {
        let name = C::NAME.to_string();
        if self.handlers.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        let typed_handler = TypedHandler::<C, H>::new(handler);
        self.handlers.insert(name, Arc::new(typed_handler));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn DynHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
