//! Redis Pub/Sub publisher.

use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracker_core::Notification;

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::EventChannel;

/// Envelope written to the channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubSubEvent {
    /// Dotted topic name, duplicated from the channel for consumers using patterns
    pub topic: String,
    pub published_at: DateTime<Utc>,
    pub data: Notification,
}

impl PubSubEvent {
    #[must_use]
    pub fn new(notification: Notification) -> Self {
        Self {
            topic: notification.topic().as_str().to_string(),
            published_at: Utc::now(),
            data: notification,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone, Debug)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &RedisPool {
        &self.pool
    }

    /// Publish an event on its topic channel, returning the receiver count
    pub async fn publish(&self, event: &PubSubEvent) -> RedisResult<u32> {
        let channel = EventChannel::for_topic(event.data.topic());
        let payload = event.to_json()?;
        self.publish_raw(channel, &payload).await
    }

    /// Publish an already-encoded payload
    pub async fn publish_raw(&self, channel: EventChannel, payload: &str) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();

        let receivers: u32 = conn.publish(&channel_name, payload).await?;

        tracing::debug!(
            channel = %channel_name,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }
}
