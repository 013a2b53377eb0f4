//! State - 呼び出しの状態
//!
//! # 状態遷移
//! - pending: host からの応答待ち（`InvocationHandle` が生きている間）
//! - succeeded: 成功（終端）
//! - failed: 失敗（終端）
//!
//! リトライや部分結果は存在しないため、終端から戻ることはありません。

/// InvocationState は一つの呼び出しの状態を表現
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationState {
    Pending,
    Succeeded,
    Failed,
}

impl InvocationState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, InvocationState::Pending)
    }
}
