use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub ttl: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTimings {
    pub success: Duration,
    pub error: Duration,
}

impl Default for NotificationTimings {
    fn default() -> Self {
        Self {
            success: Duration::from_secs(3),
            error: Duration::from_secs(5),
        }
    }
}

impl NotificationTimings {
    pub fn ttl(&self, kind: NotificationKind) -> Duration {
        match kind {
            NotificationKind::Success => self.success,
            NotificationKind::Warning | NotificationKind::Error => self.error,
        }
    }
}

/// Holds at most one visible message. Dismissal is keyed by id so the timer
/// of a replaced message cannot hide its successor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notifier {
    timings: NotificationTimings,
    next_id: u64,
    current: Option<Notification>,
}

impl Notifier {
    pub fn new(timings: NotificationTimings) -> Self {
        Self {
            timings,
            next_id: 0,
            current: None,
        }
    }

    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>) -> Notification {
        self.next_id += 1;
        let notification = Notification {
            id: self.next_id,
            kind,
            message: message.into(),
            ttl: self.timings.ttl(kind),
        };
        self.current = Some(notification.clone());
        notification
    }

    pub fn dismiss(&mut self, id: u64) {
        if self.current.as_ref().is_some_and(|current| current.id == id) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}
