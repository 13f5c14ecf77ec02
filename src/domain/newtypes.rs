// SPDX-License-Identifier: MPL-2.0
//! Range-checked newtypes for notification lifetimes and diagnostics storage.

use std::time::Duration;

// =============================================================================
// Toast Duration
// =============================================================================

/// Toast lifetime bounds in milliseconds.
pub mod toast_duration_bounds {
    /// Shortest lifetime a toast can have.
    pub const MIN_MS: u64 = 1;
    /// Longest lifetime a toast can have (one day).
    pub const MAX_MS: u64 = 24 * 60 * 60 * 1000;
    /// Lifetime used when the caller does not pick one.
    pub const DEFAULT_MS: u64 = 3000;
}

/// How long a toast stays in the queue before it expires.
///
/// Values are clamped to
/// [`toast_duration_bounds::MIN_MS`]..=[`toast_duration_bounds::MAX_MS`].
///
/// # Example
///
/// ```
/// use ciclomappa::domain::ToastDuration;
///
/// assert_eq!(ToastDuration::from_millis(0).as_millis(), 1);
/// assert_eq!(ToastDuration::default().as_millis(), 3000);
/// assert_eq!(ToastDuration::from_millis(u64::MAX).as_millis(), 86_400_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastDuration(u64);

impl ToastDuration {
    /// Creates a duration from milliseconds, clamping to valid range.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self(millis.clamp(toast_duration_bounds::MIN_MS, toast_duration_bounds::MAX_MS))
    }

    /// Creates a duration from a [`Duration`], truncating sub-millisecond precision.
    #[must_use]
    pub fn from_duration(duration: Duration) -> Self {
        Self::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    /// Returns the lifetime in milliseconds.
    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Returns the lifetime as a [`Duration`] suitable for timers.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for ToastDuration {
    fn default() -> Self {
        Self(toast_duration_bounds::DEFAULT_MS)
    }
}

impl From<Duration> for ToastDuration {
    fn from(duration: Duration) -> Self {
        Self::from_duration(duration)
    }
}

// =============================================================================
// Buffer Capacity
// =============================================================================

/// Diagnostics buffer bounds (100 to 10000 events).
pub mod buffer_capacity_bounds {
    /// Minimum buffer capacity.
    pub const MIN: usize = 100;
    /// Maximum buffer capacity.
    pub const MAX: usize = 10000;
    /// Default buffer capacity.
    pub const DEFAULT: usize = 1000;
}

/// Number of diagnostic events kept in memory, clamped to
/// [`buffer_capacity_bounds::MIN`]..=[`buffer_capacity_bounds::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    /// Creates a new buffer capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(buffer_capacity_bounds::MIN, buffer_capacity_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(buffer_capacity_bounds::DEFAULT)
    }
}
