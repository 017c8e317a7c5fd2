//! Notification system error types.
//!
//! Every notification error is cosmetic: the session keeps advancing no
//! matter what the desktop does with a message.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to send a notification.
    #[error("failed to show notification: {0}")]
    SendFailed(String),

    /// Notification permission was denied.
    #[error("notification permission denied")]
    PermissionDenied,

    /// The desktop notification service is not reachable.
    #[error("notification service unavailable: {0}")]
    NotAvailable(String),
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SendFailed(_) => "check that a notification daemon is running",
            Self::PermissionDenied => "restart the daemon without --no-notify",
            Self::NotAvailable(_) => "install a desktop notification service",
        }
    }
}
