//! Impls - ports の実装

pub mod dispatch;

pub use self::dispatch::DirectDispatch;
