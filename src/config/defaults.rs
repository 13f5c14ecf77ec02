// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Toasts**: Notification lifetime
//! - **Diagnostics**: Event buffer sizing
//! - **Platform**: Fallback platform identifier

use crate::domain::{buffer_capacity_bounds, toast_duration_bounds};

// ==========================================================================
// Toast Defaults
// ==========================================================================

/// Default lifetime of a toast notification (in milliseconds).
pub const DEFAULT_TOAST_DURATION_MS: u64 = toast_duration_bounds::DEFAULT_MS;

/// Minimum lifetime of a toast notification (in milliseconds).
pub const MIN_TOAST_DURATION_MS: u64 = toast_duration_bounds::MIN_MS;

/// Maximum lifetime of a toast notification (in milliseconds).
pub const MAX_TOAST_DURATION_MS: u64 = toast_duration_bounds::MAX_MS;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of diagnostic events kept in memory.
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = buffer_capacity_bounds::DEFAULT;

/// Minimum number of diagnostic events kept in memory.
pub const MIN_DIAGNOSTICS_BUFFER_CAPACITY: usize = buffer_capacity_bounds::MIN;

/// Maximum number of diagnostic events kept in memory.
pub const MAX_DIAGNOSTICS_BUFFER_CAPACITY: usize = buffer_capacity_bounds::MAX;

// ==========================================================================
// Platform Defaults
// ==========================================================================

/// Platform identifier reported when the native bridge cannot answer.
pub const FALLBACK_PLATFORM: &str = "web";

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_TOAST_DURATION_MS > 0);
    assert!(DEFAULT_TOAST_DURATION_MS >= MIN_TOAST_DURATION_MS);
    assert!(DEFAULT_TOAST_DURATION_MS <= MAX_TOAST_DURATION_MS);
    assert!(MAX_TOAST_DURATION_MS <= i64::MAX as u64);

    assert!(MIN_DIAGNOSTICS_BUFFER_CAPACITY > 0);
    assert!(MAX_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY <= MAX_DIAGNOSTICS_BUFFER_CAPACITY);

    assert!(!FALLBACK_PLATFORM.is_empty());
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_defaults_are_valid() {
        assert_eq!(DEFAULT_TOAST_DURATION_MS, 3000);
        assert_eq!(MIN_TOAST_DURATION_MS, 1);
        assert_eq!(MAX_TOAST_DURATION_MS, 86_400_000);
    }

    #[test]
    fn diagnostics_defaults_are_valid() {
        assert_eq!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY, 1000);
        assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY <= MAX_DIAGNOSTICS_BUFFER_CAPACITY);
    }

    #[test]
    fn fallback_platform_is_web() {
        assert_eq!(FALLBACK_PLATFORM, "web");
    }
}
