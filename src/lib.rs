// SPDX-License-Identifier: MPL-2.0
//! `ciclomappa` is the non-visual core of the CicloMappa map application.
//!
//! It provides the toast notification queue presentation code observes,
//! platform detection with a `"web"` fallback, and the diagnostics log and
//! user settings that surround them.

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod notifications;
pub mod platform;
