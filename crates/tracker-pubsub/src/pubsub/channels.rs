//! Pub/Sub channel naming.
//!
//! Every notification topic maps to one Redis channel under a shared prefix so
//! consumers can `PSUBSCRIBE tracker:events:*`.

use tracker_core::Topic;

/// Prefix shared by all notification channels
pub const CHANNEL_PREFIX: &str = "tracker:events:";

/// A Redis channel carrying one notification topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventChannel(Topic);

impl EventChannel {
    #[must_use]
    pub fn for_topic(topic: Topic) -> Self {
        Self(topic)
    }

    #[must_use]
    pub fn topic(self) -> Topic {
        self.0
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(self) -> String {
        format!("{CHANNEL_PREFIX}{}", self.0.as_str())
    }

    /// Parse a channel name back to its topic
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let topic = name.strip_prefix(CHANNEL_PREFIX)?;
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == topic)
            .map(Self)
    }
}

impl From<Topic> for EventChannel {
    fn from(topic: Topic) -> Self {
        Self(topic)
    }
}

impl std::fmt::Display for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{CHANNEL_PREFIX}{}", self.0.as_str())
    }
}
