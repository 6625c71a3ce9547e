//! Toast notifications.
//!
//! Each notification is shown until its close button is pressed or its
//! timeout passes. The most recent message is mirrored into the
//! screen-reader live region.

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    /// Font Awesome icon name.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Error => "exclamation-triangle",
            Self::Warning => "exclamation-circle",
            Self::Info => "info-circle",
        }
    }

    /// Modifier class applied to the toast element.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "ts-notification--success",
            Self::Error => "ts-notification--error",
            Self::Warning => "ts-notification--warning",
            Self::Info => "ts-notification--info",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = std::convert::Infallible;

    /// Unknown kinds fall back to `Info`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        })
    }
}

/// A toast on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub shown_at: DateTime<Utc>,
    pub dismiss_at: DateTime<Utc>,
}

/// Stack of active notifications, oldest first.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    timeout: TimeDelta,
    active: Vec<Notification>,
    live_region: Option<String>,
}

impl NotificationCenter {
    /// A center whose toasts auto-dismiss after `timeout`.
    #[must_use]
    pub const fn new(timeout: TimeDelta) -> Self {
        Self {
            timeout,
            active: Vec::new(),
            live_region: None,
        }
    }

    /// Show a notification and announce it to screen readers.
    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind, now: DateTime<Utc>) -> Uuid {
        let message = message.into();
        let id = Uuid::new_v4();
        tracing::debug!(%id, ?kind, %message, "showing notification");

        self.live_region = Some(message.clone());
        self.active.push(Notification {
            id,
            kind,
            message,
            shown_at: now,
            dismiss_at: now + self.timeout,
        });
        id
    }

    /// Close a notification. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        self.active.len() != before
    }

    /// Remove every notification whose timeout has passed at `now`.
    ///
    /// Returns how many were removed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.active.len();
        self.active.retain(|n| n.dismiss_at > now);
        before - self.active.len()
    }

    /// Earliest pending auto-dismiss time.
    #[must_use]
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.active.iter().map(|n| n.dismiss_at).min()
    }

    #[must_use]
    pub fn active(&self) -> &[Notification] {
        &self.active
    }

    /// Most recent announcement for the live region.
    #[must_use]
    pub fn live_region(&self) -> Option<&str> {
        self.live_region.as_deref()
    }

    /// Most recently shown notification still on screen.
    #[must_use]
    pub fn latest(&self) -> Option<&Notification> {
        self.active.last()
    }
}
