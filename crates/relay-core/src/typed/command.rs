//! Command trait - 型付き Command の定義
//!
//! # 学習ポイント
//! - Associated Constants (`const NAME`)
//! - Associated Types (`Args`, `Output`) で引数と戻り値を静的に束縛

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Command は command 名と引数・戻り値の型を対応付ける
///
/// # 使用例
/// ```ignore
/// pub struct Greet;
///
/// impl Command for Greet {
///     const NAME: &'static str = "greet";
///     type Args = GreetArgs;
///     type Output = String;
/// }
/// ```
///
/// 実装する型自体はマーカーで、値を持つ必要はありません。
/// 引数を取らない command は `Args = ()` とし、引数なしの呼び出しを受け付けます。
pub trait Command: Send + Sync + 'static {
    /// registry のキーであり、caller が `invoke` に渡す名前
    const NAME: &'static str;

    type Args: Serialize + DeserializeOwned + Send + 'static;

    type Output: Serialize + DeserializeOwned + Send + 'static;
}
