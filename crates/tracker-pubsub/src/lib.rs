//! # tracker-pubsub
//!
//! Outbound notifications for the identity core.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: each notification topic is published on `tracker:events:<topic>`
//! - **Adapters**: `RedisNotifier` for deployments, `InMemoryNotifier` for tests
//!   and `LoggingNotifier` when no broker is configured
//!
//! ## Example
//!
//! ```ignore
//! use tracker_pubsub::{RedisNotifier, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let notifier = RedisNotifier::new(pool.clone());
//! notifier.notify(&Notification::user_refreshed(user_id)).await?;
//! ```

pub mod notifier;
pub mod pool;
pub mod pubsub;

pub use notifier::{InMemoryNotifier, LoggingNotifier, RedisHealthProbe, RedisNotifier};
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use pubsub::{EventChannel, PubSubEvent, Publisher, CHANNEL_PREFIX};
