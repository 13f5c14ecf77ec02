// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! This module defines the `Notification` struct and the `Category` tag
//! used throughout the notification system.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::domain::ToastDuration;

/// Unique identifier for a notification.
///
/// Drawn from a process-wide counter, so two notifications created in the
/// same clock tick still get distinct identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates a new unique notification ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Severity tag attached to a notification.
///
/// The four known tags get their own variants; any other tag is kept
/// verbatim in [`Category::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Custom(String),
}

impl Category {
    /// Returns the tag as presentation code expects it (`"info"`, `"error"`, ...).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Category::Info => "info",
            Category::Success => "success",
            Category::Warning => "warning",
            Category::Error => "error",
            Category::Custom(tag) => tag,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(tag))
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "info" => Category::Info,
            "success" => Category::Success,
            "warning" => Category::Warning,
            "error" => Category::Error,
            _ => Category::Custom(tag.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    id: NotificationId,
    category: Category,
    message: String,
    created_at: DateTime<Utc>,
    duration: ToastDuration,
}

impl Notification {
    /// Creates a notification with the default lifetime.
    ///
    /// The message is kept verbatim, empty text included.
    pub fn new(category: impl Into<Category>, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            category: category.into(),
            message: message.into(),
            created_at: Utc::now(),
            duration: ToastDuration::default(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Category::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Category::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Category::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Category::Error, message)
    }

    /// Sets how long the notification stays queued.
    #[must_use]
    pub fn with_duration(mut self, duration: ToastDuration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn duration(&self) -> ToastDuration {
        self.duration
    }

    /// Wall-clock time at which the notification is scheduled to expire.
    ///
    /// Saturates at [`DateTime::<Utc>::MAX_UTC`]; lifetimes are capped at one
    /// day so this only happens near the end of chrono's range.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        i64::try_from(self.duration.as_millis())
            .ok()
            .and_then(chrono::TimeDelta::try_milliseconds)
            .and_then(|lifetime| self.created_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
