//! Transient user-facing status messages, independent of submission state.

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// How a dismissal was initiated. Clicking away from the notification is
/// deliberately ignored; only explicit close actions hide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTrigger {
    Explicit,
    ClickAway,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    severity: Severity,
    message: String,
    visible: bool,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            visible: true,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Dismissing a hidden notification is a no-op. A `ClickAway` trigger
    /// leaves the notification visible.
    pub fn dismiss(&mut self, trigger: DismissTrigger) {
        if trigger == DismissTrigger::Explicit {
            self.visible = false;
        }
    }
}
