//! DispatchStrategy port - command 名から handler キーへのマッピング
//!
//! # 実装
//! - DirectDispatch（command 名 == handler キー）

use crate::domain::{CommandName, FailureDescriptor};

/// DispatchStrategy は request の command 名を registry のキーに解決
///
/// 解決できない場合は caller にそのまま返る [`FailureDescriptor`] を返します。
pub trait DispatchStrategy: Send + Sync {
    fn select_handler(&self, name: &CommandName) -> Result<String, FailureDescriptor>;
}
