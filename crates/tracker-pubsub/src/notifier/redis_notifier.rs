use async_trait::async_trait;
use tracker_core::{HealthProbe, Notification, Notifier, NotifyError};

use crate::pool::{RedisPool, RedisPoolError};
use crate::pubsub::{PubSubEvent, Publisher};

/// Publishes every notification on its topic channel
#[derive(Clone, Debug)]
pub struct RedisNotifier {
    publisher: Publisher,
}

impl RedisNotifier {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            publisher: Publisher::new(pool),
        }
    }
}

impl From<RedisPoolError> for NotifyError {
    fn from(err: RedisPoolError) -> Self {
        match err {
            RedisPoolError::Serialization(e) => NotifyError::Encode(e.to_string()),
            other => NotifyError::Transport(other.to_string()),
        }
    }
}

#[async_trait]
impl Notifier for RedisNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let event = PubSubEvent::new(notification.clone());
        let receivers = self.publisher.publish(&event).await?;
        if receivers == 0 {
            tracing::debug!(topic = %event.topic, "Notification had no subscribers");
        }
        Ok(())
    }
}

/// Readiness probe that pings Redis
#[derive(Clone, Debug)]
pub struct RedisHealthProbe {
    pool: RedisPool,
}

impl RedisHealthProbe {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthProbe for RedisHealthProbe {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn check(&self) -> bool {
        match self.pool.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Redis health check failed");
                false
            }
        }
    }
}
