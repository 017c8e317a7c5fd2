//! `notify-rust` backed desktop notifier.

use std::sync::atomic::{AtomicBool, Ordering};

use notify_rust::Notification;
use tracing::debug;

use super::error::NotificationError;
use super::{NotificationPermission, Notifier};

/// Application name shown by the notification service.
pub const APP_NAME: &str = "Pomodoro Clock";

/// Shows notifications through the platform notification service.
///
/// The desktop has no permission prompt of its own, so permission is
/// granted on first request unless notifications were disabled at startup.
#[derive(Debug)]
pub struct DesktopNotifier {
    enabled: bool,
    requested: AtomicBool,
}

impl DesktopNotifier {
    /// Creates a notifier. A disabled notifier reports `Denied`.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            requested: AtomicBool::new(false),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> NotificationPermission {
        if !self.enabled {
            NotificationPermission::Denied
        } else if self.requested.load(Ordering::Relaxed) {
            NotificationPermission::Granted
        } else {
            NotificationPermission::Default
        }
    }

    fn request_permission(&self) -> NotificationPermission {
        if !self.enabled {
            return NotificationPermission::Denied;
        }
        self.requested.store(true, Ordering::Relaxed);
        debug!("Desktop notifications granted");
        NotificationPermission::Granted
    }

    fn show(&self, message: &str) -> Result<(), NotificationError> {
        Notification::new()
            .appname(APP_NAME)
            .summary(APP_NAME)
            .body(message)
            .show()
            .map(|_| ())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}
