// SPDX-License-Identifier: MPL-2.0
//! Platform detection.
//!
//! Presentation code adapts to the host it runs on (Android, iOS, desktop or
//! plain browser). The host is reported by a [`PlatformBridge`]; when the
//! bridge cannot answer, the platform is the literal [`FALLBACK_PLATFORM`]
//! (`"web"`).
//!
//! # Example
//!
//! ```
//! use ciclomappa::platform::{self, BridgeError, FixedBridge};
//!
//! assert_eq!(platform::get_platform(&FixedBridge::new("android")), "android");
//!
//! let broken = || -> Result<String, BridgeError> { Err(BridgeError::Unavailable) };
//! assert_eq!(platform::get_platform(&broken), "web");
//! ```

mod native;

pub use crate::config::FALLBACK_PLATFORM;
pub use native::{FixedBridge, NativeBridge};

use crate::diagnostics::{DiagnosticEventKind, DiagnosticsHandle};
use std::fmt;

/// Why a bridge could not report the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// No native bridge exists on this target.
    Unavailable,
    /// The bridge exists but its query failed.
    Failed(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Unavailable => write!(f, "native bridge unavailable"),
            BridgeError::Failed(msg) => write!(f, "native bridge query failed: {msg}"),
        }
    }
}

impl std::error::Error for BridgeError {}

/// Native capability that names the runtime host.
///
/// Closures returning `Result<String, BridgeError>` are bridges too.
pub trait PlatformBridge {
    /// Returns the host platform name (`"android"`, `"ios"`, `"linux"`, ...).
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] when the host cannot be determined.
    fn platform(&self) -> Result<String, BridgeError>;
}

impl<F> PlatformBridge for F
where
    F: Fn() -> Result<String, BridgeError>,
{
    fn platform(&self) -> Result<String, BridgeError> {
        self()
    }
}

/// Outcome of a platform query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformQuery {
    /// The bridge answered.
    Reported(String),
    /// The bridge failed; the platform is [`FALLBACK_PLATFORM`].
    Fallback(BridgeError),
}

impl PlatformQuery {
    /// Returns the reported name, or `"web"` on fallback.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            PlatformQuery::Reported(name) => name,
            PlatformQuery::Fallback(_) => FALLBACK_PLATFORM,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, PlatformQuery::Fallback(_))
    }

    #[must_use]
    pub fn into_name(self) -> String {
        match self {
            PlatformQuery::Reported(name) => name,
            PlatformQuery::Fallback(_) => FALLBACK_PLATFORM.to_string(),
        }
    }

    /// Records the outcome as a `PlatformDetected` diagnostics event.
    pub fn log(&self, handle: &DiagnosticsHandle) {
        let reason = match self {
            PlatformQuery::Reported(_) => None,
            PlatformQuery::Fallback(err) => Some(err.to_string()),
        };
        handle.log(DiagnosticEventKind::PlatformDetected {
            platform: self.name().to_string(),
            fallback: self.is_fallback(),
            reason,
        });
    }
}

/// Asks `bridge` for the platform, keeping the failure if there is one.
pub fn query(bridge: &impl PlatformBridge) -> PlatformQuery {
    match bridge.platform() {
        Ok(name) => PlatformQuery::Reported(name),
        Err(err) => PlatformQuery::Fallback(err),
    }
}

/// Returns the platform name reported by `bridge`, or `"web"` if it fails.
pub fn get_platform(bridge: &impl PlatformBridge) -> String {
    query(bridge).into_name()
}

/// Queries the [`NativeBridge`] of the running binary.
#[must_use]
pub fn detect() -> PlatformQuery {
    query(&NativeBridge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticsCollector;
    use std::cell::Cell;

    fn failing() -> Result<String, BridgeError> {
        Err(BridgeError::Failed("plugin not registered".to_string()))
    }

    #[test]
    fn reported_value_is_returned() {
        let bridge = || -> Result<String, BridgeError> { Ok("ios".to_string()) };
        assert_eq!(get_platform(&bridge), "ios");
        assert_eq!(query(&bridge), PlatformQuery::Reported("ios".to_string()));
    }

    #[test]
    fn failing_bridge_falls_back_to_web() {
        assert_eq!(get_platform(&failing), "web");

        let outcome = query(&failing);
        assert!(outcome.is_fallback());
        assert_eq!(outcome.name(), FALLBACK_PLATFORM);
    }

    #[test]
    fn unavailable_bridge_falls_back_to_web() {
        let bridge = || -> Result<String, BridgeError> { Err(BridgeError::Unavailable) };
        assert_eq!(get_platform(&bridge), "web");
    }

    #[test]
    fn every_call_queries_the_bridge() {
        let calls = Cell::new(0);
        let bridge = || -> Result<String, BridgeError> {
            calls.set(calls.get() + 1);
            Ok("android".to_string())
        };

        get_platform(&bridge);
        get_platform(&bridge);

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn detect_matches_native_bridge() {
        assert_eq!(detect(), query(&NativeBridge));
    }

    #[test]
    fn bridge_error_display() {
        assert_eq!(BridgeError::Unavailable.to_string(), "native bridge unavailable");
        assert!(BridgeError::Failed("boom".into()).to_string().contains("boom"));
    }

    #[test]
    fn log_records_fallback_reason() {
        let mut collector = DiagnosticsCollector::default();
        query(&failing).log(&collector.handle());
        query(&FixedBridge::new("android")).log(&collector.handle());
        collector.process_pending();

        let kinds: Vec<_> = collector.iter().map(|event| event.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticEventKind::PlatformDetected {
                    platform: "web".to_string(),
                    fallback: true,
                    reason: Some("native bridge query failed: plugin not registered".to_string()),
                },
                DiagnosticEventKind::PlatformDetected {
                    platform: "android".to_string(),
                    fallback: false,
                    reason: None,
                },
            ]
        );
    }
}
