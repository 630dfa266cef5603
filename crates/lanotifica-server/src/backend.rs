//! Desktop notification backend.
//!
//! The relay talks to the notification service through the
//! [`NotificationBackend`] trait. [`DesktopBackend`] is the freedesktop
//! implementation: notify-rust shows notifications and closing goes straight
//! to `org.freedesktop.Notifications.CloseNotification` on the session bus.

use std::fmt;

use thiserror::Error;

use lanotifica_core::Presentation;

/// Identifier assigned by the notification service to a shown notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u32);

impl NotificationId {
    /// Wraps a raw id.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors reported by a notification backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The notification could not be shown.
    #[error("failed to show notification: {0}")]
    Show(String),

    /// The notification could not be closed.
    #[error("failed to close notification {id}: {message}")]
    Close { id: NotificationId, message: String },

    /// No notification service on this platform.
    #[error("desktop notifications are not supported on this platform")]
    Unsupported,

    /// The blocking task running the backend call panicked or was cancelled.
    #[error("backend task failed: {0}")]
    TaskFailed(String),
}

/// Displays and closes notifications. Calls may block.
pub trait NotificationBackend: Send + Sync {
    /// Shows a notification and returns its id.
    fn show(&self, presentation: &Presentation) -> Result<NotificationId, BackendError>;

    /// Closes a notification. Closing an id that is already gone succeeds.
    fn close(&self, id: NotificationId) -> Result<(), BackendError>;
}

/// Backend for the freedesktop notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopBackend;

impl DesktopBackend {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
mod xdg {
    use notify_rust::{Notification, Timeout, Urgency};
    use tracing::debug;

    use lanotifica_core::{Presentation, TimeoutPolicy, Urgency as Level};

    use super::{BackendError, DesktopBackend, NotificationBackend, NotificationId};

    const BUS_NAME: &str = "org.freedesktop.Notifications";
    const OBJECT_PATH: &str = "/org/freedesktop/Notifications";
    const INTERFACE: &str = "org.freedesktop.Notifications";

    fn timeout(policy: TimeoutPolicy) -> Timeout {
        match policy {
            TimeoutPolicy::Default => Timeout::Default,
            TimeoutPolicy::Never => Timeout::Never,
            TimeoutPolicy::Milliseconds(ms) => Timeout::Milliseconds(ms),
        }
    }

    /// Whether a `CloseNotification` error came from the notification
    /// server refusing an unknown id. Errors in the bus namespace (no
    /// server, timeout, access denied) mean the call never reached one.
    fn is_already_closed(error_name: &str) -> bool {
        !error_name.starts_with("org.freedesktop.DBus.Error.")
    }

    fn urgency(level: Level) -> Urgency {
        match level {
            Level::Low => Urgency::Low,
            Level::Normal => Urgency::Normal,
            Level::Critical => Urgency::Critical,
        }
    }

    impl NotificationBackend for DesktopBackend {
        fn show(&self, presentation: &Presentation) -> Result<NotificationId, BackendError> {
            let mut notification = Notification::new();
            notification
                .summary(&presentation.title)
                .body(&presentation.body)
                .icon(&presentation.app_icon)
                .timeout(timeout(presentation.timeout));

            if let Some(ref name) = presentation.app_name {
                notification.appname(name);
            }
            if let Some(ref image) = presentation.image_path {
                notification.image_path(image);
            }
            if let Some(level) = presentation.urgency {
                notification.urgency(urgency(level));
            }

            let handle = notification
                .show()
                .map_err(|e| BackendError::Show(e.to_string()))?;
            Ok(NotificationId::new(handle.id()))
        }

        fn close(&self, id: NotificationId) -> Result<(), BackendError> {
            let close_error = |e: zbus::Error| BackendError::Close {
                id,
                message: e.to_string(),
            };

            let connection = zbus::blocking::Connection::session().map_err(close_error)?;
            match connection.call_method(
                Some(BUS_NAME),
                OBJECT_PATH,
                Some(INTERFACE),
                "CloseNotification",
                &(id.get(),),
            ) {
                Ok(_) => Ok(()),
                // The server answered but refused: the id expired or was
                // already closed.
                Err(zbus::Error::MethodError(name, detail, _))
                    if is_already_closed(name.as_str()) =>
                {
                    debug!(
                        id = id.get(),
                        error = %name,
                        detail = detail.as_deref().unwrap_or(""),
                        "Notification already closed"
                    );
                    Ok(())
                }
                Err(e) => Err(close_error(e)),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn timeout_mapping() {
            assert_eq!(timeout(TimeoutPolicy::Default), Timeout::Default);
            assert_eq!(timeout(TimeoutPolicy::Never), Timeout::Never);
            assert_eq!(
                timeout(TimeoutPolicy::Milliseconds(1500)),
                Timeout::Milliseconds(1500)
            );
        }

        #[test]
        fn server_refusal_counts_as_closed() {
            assert!(is_already_closed("org.freedesktop.Notifications.Error.InvalidId"));
            assert!(is_already_closed("org.gnome.Shell.Error"));
        }

        #[test]
        fn bus_errors_are_failures() {
            for name in [
                "org.freedesktop.DBus.Error.ServiceUnknown",
                "org.freedesktop.DBus.Error.NoReply",
                "org.freedesktop.DBus.Error.AccessDenied",
                "org.freedesktop.DBus.Error.Disconnected",
            ] {
                assert!(!is_already_closed(name), "{name}");
            }
        }

        #[test]
        fn urgency_mapping() {
            assert_eq!(urgency(Level::Low), Urgency::Low);
            assert_eq!(urgency(Level::Normal), Urgency::Normal);
            assert_eq!(urgency(Level::Critical), Urgency::Critical);
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
impl NotificationBackend for DesktopBackend {
    fn show(&self, _presentation: &Presentation) -> Result<NotificationId, BackendError> {
        Err(BackendError::Unsupported)
    }

    fn close(&self, _id: NotificationId) -> Result<(), BackendError> {
        Err(BackendError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_id_roundtrip() {
        let id = NotificationId::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn close_error_message() {
        let err = BackendError::Close {
            id: NotificationId::new(7),
            message: "no session bus".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to close notification 7: no session bus"
        );
    }
}
