// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for notification and platform activity.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Why a notification left the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// Its lifetime elapsed.
    Expired,
    /// It was dismissed explicitly before expiring.
    Dismissed,
}

/// A warning surfaced to the user as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningEvent {
    pub notification_id: u64,
    pub message: String,
}

/// An error surfaced to the user as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub notification_id: u64,
    pub message: String,
}

/// A single diagnostic event with its capture time.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// When the event occurred (monotonic clock for duration calculations)
    pub timestamp: Instant,
    /// The type and data of the event
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event with the current timestamp.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }
}

/// The type and associated data for a diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    /// A notification was appended to the queue.
    NotificationShown {
        notification_id: u64,
        category: String,
        duration_ms: u64,
    },

    /// A notification left the queue.
    NotificationRemoved {
        notification_id: u64,
        reason: RemovalReason,
    },

    /// The whole queue was cleared at once.
    NotificationsCleared { count: usize },

    /// A warning-category notification was shown.
    Warning { event: WarningEvent },

    /// An error-category notification was shown.
    Error { event: ErrorEvent },

    /// The host platform was resolved.
    PlatformDetected {
        platform: String,
        /// True when the native bridge failed and the fallback was used.
        fallback: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}
