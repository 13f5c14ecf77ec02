// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module: the crate's structured activity log.
//!
//! Queue and platform activity is recorded as [`DiagnosticEvent`]s sent
//! through a [`DiagnosticsHandle`], kept in a memory-bounded
//! [`CircularBuffer`] by the [`DiagnosticsCollector`], and exported on demand
//! as a JSON [`DiagnosticReport`].

mod buffer;
mod collector;
mod events;
mod export;
mod report;

pub use buffer::CircularBuffer;
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{DiagnosticEvent, DiagnosticEventKind, ErrorEvent, RemovalReason, WarningEvent};
pub use export::{
    default_export_directory, generate_default_filename, resolve_export_path, ExportError,
};
pub use report::{DiagnosticReport, ReportMetadata, ReportSummary, SerializableEvent};
