//! Driven port for outgoing notifications.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification adapters.
    pub enum NotificationError {
        /// The message could not be handed to the transport.
        Delivery { message: String } => "notification delivery failed: {message}",
    }
}

/// Port for sending a short notification.
///
/// Callers treat delivery as fire-and-forget: a failure is logged and never
/// undoes the change that triggered it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Send `message` under `subject`.
    async fn send(&self, subject: &str, message: &str) -> Result<(), NotificationError>;
}

/// Sender that accepts every message and drops it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationSender;

#[async_trait]
impl NotificationSender for FixtureNotificationSender {
    async fn send(&self, _subject: &str, _message: &str) -> Result<(), NotificationError> {
        Ok(())
    }
}
