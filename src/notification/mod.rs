//! Desktop notification support.
//!
//! This module provides:
//!
//! - The [`Notifier`] capability used by the daemon's effect dispatcher
//! - Permission handling (ask once, then show or drop)
//! - A `notify-rust` backed [`DesktopNotifier`]
//! - A recording [`MockNotifier`] for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use pomoclock::notification::{DesktopNotifier, Notifier};
//!
//! let notifier = DesktopNotifier::new(true);
//! if let Err(e) = notifier.notify("Break over! Time to focus again.") {
//!     eprintln!("notification failed: {}", e);
//! }
//! ```

mod desktop;
pub mod error;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub use self::desktop::{DesktopNotifier, APP_NAME};
pub use self::error::NotificationError;

/// Whether the user allows notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    /// Not asked yet
    Default,
    /// Notifications may be shown
    Granted,
    /// Notifications must not be shown
    Denied,
}

/// What happened to a message handed to [`Notifier::notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The message was displayed
    Shown,
    /// Permission was missing; the message was discarded
    Dropped,
}

/// A desktop notification capability.
pub trait Notifier: Send + Sync {
    /// Returns the current permission state.
    fn permission(&self) -> NotificationPermission;

    /// Asks for permission and returns the answer.
    fn request_permission(&self) -> NotificationPermission;

    /// Displays a message unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the desktop refused the notification.
    fn show(&self, message: &str) -> Result<(), NotificationError>;

    /// Displays a message if permission allows, asking first when it has
    /// never been requested.
    ///
    /// # Errors
    ///
    /// Returns an error if showing the notification failed.
    fn notify(&self, message: &str) -> Result<Delivery, NotificationError> {
        let permission = match self.permission() {
            NotificationPermission::Default => self.request_permission(),
            decided => decided,
        };

        match permission {
            NotificationPermission::Granted => {
                self.show(message)?;
                Ok(Delivery::Shown)
            }
            NotificationPermission::Default | NotificationPermission::Denied => {
                tracing::debug!("Notification dropped without permission: {}", message);
                Ok(Delivery::Dropped)
            }
        }
    }
}

/// Mock notifier for testing.
#[derive(Debug)]
pub struct MockNotifier {
    shown: Mutex<Vec<String>>,
    permission: Mutex<NotificationPermission>,
    grant_on_request: AtomicBool,
    request_count: AtomicUsize,
    should_fail: AtomicBool,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    /// Creates a mock that already has permission.
    #[must_use]
    pub fn new() -> Self {
        Self::with_permission(NotificationPermission::Granted)
    }

    /// Creates a mock with the given permission state.
    #[must_use]
    pub fn with_permission(permission: NotificationPermission) -> Self {
        Self {
            shown: Mutex::new(Vec::new()),
            permission: Mutex::new(permission),
            grant_on_request: AtomicBool::new(true),
            request_count: AtomicUsize::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    /// Sets the answer given when permission is requested.
    pub fn set_grant_on_request(&self, grant: bool) {
        self.grant_on_request.store(grant, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Notifier for MockNotifier {
    fn permission(&self) -> NotificationPermission {
        *self.permission.lock().unwrap()
    }

    fn request_permission(&self) -> NotificationPermission {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        let answer = if self.grant_on_request.load(Ordering::SeqCst) {
            NotificationPermission::Granted
        } else {
            NotificationPermission::Denied
        };
        *self.permission.lock().unwrap() = answer;
        answer
    }

    fn show(&self, message: &str) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.shown.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granted_shows_without_asking() {
        let mock = MockNotifier::new();

        let delivery = mock.notify("hello").unwrap();

        assert_eq!(delivery, Delivery::Shown);
        assert_eq!(mock.shown(), vec!["hello".to_string()]);
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn test_default_asks_then_shows() {
        let mock = MockNotifier::with_permission(NotificationPermission::Default);

        let delivery = mock.notify("hello").unwrap();

        assert_eq!(delivery, Delivery::Shown);
        assert_eq!(mock.request_count(), 1);
        assert_eq!(mock.permission(), NotificationPermission::Granted);

        mock.notify("again").unwrap();
        assert_eq!(mock.request_count(), 1);
        assert_eq!(mock.shown().len(), 2);
    }

    #[test]
    fn test_default_refused_drops() {
        let mock = MockNotifier::with_permission(NotificationPermission::Default);
        mock.set_grant_on_request(false);

        let delivery = mock.notify("hello").unwrap();

        assert_eq!(delivery, Delivery::Dropped);
        assert!(mock.shown().is_empty());
        assert_eq!(mock.permission(), NotificationPermission::Denied);
    }

    #[test]
    fn test_denied_never_asks() {
        let mock = MockNotifier::with_permission(NotificationPermission::Denied);

        let delivery = mock.notify("hello").unwrap();

        assert_eq!(delivery, Delivery::Dropped);
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn test_show_failure_is_reported() {
        let mock = MockNotifier::new();
        mock.set_should_fail(true);

        let result = mock.notify("hello");
        assert!(matches!(result, Err(NotificationError::SendFailed(_))));
    }

    #[test]
    fn test_usable_as_trait_object() {
        let notifier: Box<dyn Notifier> = Box::new(MockNotifier::new());
        assert_eq!(notifier.notify("dyn").unwrap(), Delivery::Shown);
    }
}
