use async_trait::async_trait;

use crate::domain::identity::notifications::Notification;
use crate::identity::errors::NotificationError;
use crate::identity::ports::Notifier;

/// Notifier for deployments without a broker: the email is only logged.
///
/// The body is not logged since it may carry a reset link or a temporary
/// password.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        tracing::info!(
            to = %notification.to,
            subject = %notification.subject,
            "Email delivery skipped: no broker configured"
        );
        Ok(())
    }
}
