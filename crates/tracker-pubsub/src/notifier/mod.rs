//! `Notifier` adapters.

mod memory;
mod redis_notifier;

pub use memory::{InMemoryNotifier, LoggingNotifier};
pub use redis_notifier::{RedisHealthProbe, RedisNotifier};
