//! Notification display

use crate::state::{Notification, Severity};
use std::time::Duration;

/// Receives every notification the controller emits
#[cfg_attr(test, mockall::automock)]
pub trait NotificationBridge: Send + Sync {
    fn notify(&self, notification: &Notification, duration_hint: Duration);
}

/// Prints notifications to stderr
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl NotificationBridge for ConsoleNotifier {
    fn notify(&self, notification: &Notification, _duration_hint: Duration) {
        eprintln!("{}", format_notification(notification));
    }
}

pub fn format_notification(notification: &Notification) -> String {
    let marker = match notification.severity {
        Severity::Info => "i",
        Severity::Success => "✓",
        Severity::Error => "✗",
    };
    format!(
        "[{marker}] {}: {}",
        notification.severity.label(),
        notification.message
    )
}
