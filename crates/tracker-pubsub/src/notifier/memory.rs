use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracker_core::{Notification, Notifier, NotifyError, Topic};

/// Records notifications in process, for tests and local runs
#[derive(Clone, Debug, Default)]
pub struct InMemoryNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far, oldest first
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }

    #[must_use]
    pub fn on_topic(&self, topic: Topic) -> Vec<Notification> {
        self.sent
            .lock()
            .iter()
            .filter(|n| n.topic() == topic)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn count(&self, topic: Topic) -> usize {
        self.sent.lock().iter().filter(|n| n.topic() == topic).count()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().push(notification.clone());
        Ok(())
    }
}

/// Writes notifications to the log when no broker is configured
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        // Invitation tokens are bearer secrets, so the payload is never logged
        tracing::info!(
            topic = %notification.topic(),
            at = %notification.timestamp(),
            "Notification emitted"
        );
        Ok(())
    }
}
