//! Ports - 抽象化レイヤー
//!
//! host と caller が依存する外部要素（時刻、ID 生成、dispatch 規則）を
//! trait として定義し、実装の詳細を隠蔽します。

pub mod clock;
pub mod dispatch;
pub mod id_generator;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::dispatch::DispatchStrategy;
pub use self::id_generator::{IdGenerator, UlidGenerator};
