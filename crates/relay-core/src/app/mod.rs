//! App - アプリケーション層
//!
//! ports と typed を組み合わせて、呼び出しの往復を実装します。
//!
//! # 主要コンポーネント
//! - **HostBuilder**: host の構築と起動時検証
//! - **Host**: handler の実行と結果の正規化、受信ループ
//! - **Invoker**: caller 側の入口（`invoke` / `dispatch`）

pub mod builder;
pub mod host;
pub mod invoker;

pub use self::builder::{BuildError, HostBuilder};
pub use self::host::{Host, HostHandle};
pub use self::invoker::{InvocationHandle, Invoker};
