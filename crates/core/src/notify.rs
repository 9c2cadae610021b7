use async_trait::async_trait;

use crate::{domain::notification::Notification, errors::NotificationError};

/// Sends a single SMS notification. Implementations collapse every failure
/// into [`NotificationError`].
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
}
