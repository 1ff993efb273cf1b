//! User-facing notifications and their expiry

use std::time::{Duration, Instant};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A transient status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    #[cfg(test)]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    #[cfg(test)]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }
}

/// Holds the single current notification.
///
/// Every `set` arms its own clear deadline. Deadlines are never cancelled:
/// when the earliest one passes, whatever is showing at that moment is
/// cleared, including a message set after the one that armed it.
#[derive(Debug, Default)]
pub struct NotificationSlot {
    current: Option<Notification>,
    deadlines: Vec<Instant>,
}

impl NotificationSlot {
    /// Replace the current notification (last write wins).
    /// Deadlines already due are dropped first.
    pub fn set(&mut self, notification: Notification, now: Instant, timeout: Duration) {
        self.deadlines.retain(|deadline| *deadline > now);
        self.current = Some(notification);
        self.deadlines.push(now + timeout);
    }

    /// Fire every deadline at or before `now`.
    /// Returns true if the current notification was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.deadlines.len();
        self.deadlines.retain(|deadline| *deadline > now);
        if self.deadlines.len() == before {
            return false;
        }
        self.current.take().is_some()
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Number of armed, not yet fired deadlines
    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.deadlines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(5000);

    #[test]
    fn test_set_replaces_current() {
        let now = Instant::now();
        let mut slot = NotificationSlot::default();
        slot.set(Notification::success("Importing Form..."), now, TIMEOUT);
        slot.set(Notification::error("Error Importing Form"), now, TIMEOUT);

        assert_eq!(
            slot.current(),
            Some(&Notification::error("Error Importing Form"))
        );
        assert_eq!(slot.pending_timers(), 2);
    }

    #[test]
    fn test_expire_before_deadline_keeps_message() {
        let now = Instant::now();
        let mut slot = NotificationSlot::default();
        slot.set(Notification::success("Imported Successfully"), now, TIMEOUT);

        assert!(!slot.expire(now + Duration::from_millis(4999)));
        assert!(slot.current().is_some());
    }

    #[test]
    fn test_expire_at_deadline_clears() {
        let now = Instant::now();
        let mut slot = NotificationSlot::default();
        slot.set(Notification::success("Imported Successfully"), now, TIMEOUT);

        assert!(slot.expire(now + TIMEOUT));
        assert!(slot.current().is_none());
        assert_eq!(slot.pending_timers(), 0);
    }

    #[test]
    fn test_earlier_deadline_clears_later_message() {
        let start = Instant::now();
        let mut slot = NotificationSlot::default();
        slot.set(Notification::success("Importing Form..."), start, TIMEOUT);
        let later = start + Duration::from_millis(3000);
        slot.set(Notification::success("Imported Successfully"), later, TIMEOUT);

        // First deadline fires and takes the second message with it
        assert!(slot.expire(start + TIMEOUT));
        assert!(slot.current().is_none());
        assert_eq!(slot.pending_timers(), 1);

        // The remaining deadline has nothing left to clear
        assert!(!slot.expire(later + TIMEOUT));
        assert_eq!(slot.pending_timers(), 0);
    }

    #[test]
    fn test_set_drops_due_deadlines() {
        let start = Instant::now();
        let mut slot = NotificationSlot::default();
        for i in 0..100 {
            slot.set(
                Notification::success("Importing Form..."),
                start + TIMEOUT * i,
                TIMEOUT,
            );
        }

        // Only the deadline armed by the last set is still pending
        assert_eq!(slot.pending_timers(), 1);
        assert_eq!(
            slot.current(),
            Some(&Notification::success("Importing Form..."))
        );
    }

    #[test]
    fn test_expire_on_empty_slot() {
        let mut slot = NotificationSlot::default();
        assert!(!slot.expire(Instant::now()));
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::Info.label(), "info");
        assert_eq!(Severity::Success.label(), "success");
        assert_eq!(Severity::Error.label(), "error");
    }
}
