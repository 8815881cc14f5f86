//! Outbound notification port

use async_trait::async_trait;
use thiserror::Error;

use crate::events::Notification;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to encode notification: {0}")]
    Encode(String),

    #[error("notification transport failed: {0}")]
    Transport(String),
}

/// Fire-and-forget publication of committed state changes
///
/// Delivery is at-least-once with no cross-topic ordering. Callers log
/// failures and never propagate them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}
