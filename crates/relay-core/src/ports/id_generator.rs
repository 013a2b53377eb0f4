//! IdGenerator port - ID 生成の抽象化
//!
//! テスト容易性のために、trait として抽象化しています。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（Clock から timestamp を取る）

use crate::domain::InvocationId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は invocation ごとの ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（`Invoker` の clone 間で共有される）
pub trait IdGenerator: Send + Sync {
    fn generate_invocation_id(&self) -> InvocationId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// FixedClock を使えば timestamp 部分が決定的になります。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_invocation_id(&self) -> InvocationId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        InvocationId::from(ulid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn ulid_generator_generates_unique_ids() {
        let id_gen = UlidGenerator::new(SystemClock);

        let id1 = id_gen.generate_invocation_id();
        let id2 = id_gen.generate_invocation_id();
        let id3 = id_gen.generate_invocation_id();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn ulid_generator_with_fixed_clock_shares_timestamp() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(FixedClock::new(fixed_time));

        let id1 = id_gen.generate_invocation_id();
        let id2 = id_gen.generate_invocation_id();

        // ランダム部分があるので ID 自体は異なる
        assert_ne!(id1, id2);
        assert_eq!(id1.timestamp_ms(), id2.timestamp_ms());
        assert_eq!(id1.timestamp_ms(), fixed_time.timestamp_millis() as u64);
    }
}
