//! Transient submission notification.

use serde::{Deserialize, Serialize};

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Success,
    Error,
}

impl Severity {
    /// Lowercase name, used as a CSS modifier and ARIA hint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Message shown after a submission completes.
///
/// Dismissing only closes it; the message and severity stay so a closing
/// animation can still render them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub open: bool,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    /// How long an open notification stays visible before hiding itself.
    pub const AUTO_HIDE_MS: u32 = 6000;

    pub const SUBMITTED: &'static str = "Order submitted successfully!";
    pub const SUBMIT_FAILED: &'static str = "Error submitting order. Please try again.";
    pub const INCOMPLETE: &'static str = "Please fill in all required fields.";
    pub const TOO_MANY: &'static str =
        "Too many orders in a short time. Please wait a moment and try again.";

    /// An open success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            open: true,
            message: message.into(),
            severity: Severity::Success,
        }
    }

    /// An open error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            open: true,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Close the notification, by timeout or user action.
    pub fn dismiss(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_closed() {
        let notification = Notification::default();
        assert!(!notification.open);
        assert!(notification.message.is_empty());
    }

    #[test]
    fn test_dismiss_keeps_message_and_severity() {
        let mut notification = Notification::error(Notification::SUBMIT_FAILED);
        notification.dismiss();
        assert!(!notification.open);
        assert_eq!(notification.message, Notification::SUBMIT_FAILED);
        assert!(notification.is_error());
    }

    #[test]
    fn test_severity_names() {
        assert_eq!(Severity::Success.as_str(), "success");
        assert_eq!(Severity::Error.as_str(), "error");
    }
}
