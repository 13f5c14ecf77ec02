// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.
//!
//! Producers hold a cloneable [`DiagnosticsHandle`]; the owner of the
//! [`DiagnosticsCollector`] drains pending events into a circular buffer and
//! exports them as a JSON report.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use super::export::{write_atomic, ExportError};
use super::{
    CircularBuffer, DiagnosticEvent, DiagnosticEventKind, DiagnosticReport, ErrorEvent,
    RemovalReason, ReportMetadata, SerializableEvent, WarningEvent,
};
use crate::domain::BufferCapacity;

/// Handle for sending diagnostic events to the collector.
///
/// Cheap to clone and `Send`. Sending never blocks: when the channel is
/// full the event is dropped.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    /// Logs an event of the given kind.
    pub fn log(&self, kind: DiagnosticEventKind) {
        let _ = self.event_tx.try_send(DiagnosticEvent::new(kind));
    }

    pub fn log_notification_shown(&self, notification_id: u64, category: &str, duration_ms: u64) {
        self.log(DiagnosticEventKind::NotificationShown {
            notification_id,
            category: category.to_string(),
            duration_ms,
        });
    }

    pub fn log_notification_removed(&self, notification_id: u64, reason: RemovalReason) {
        self.log(DiagnosticEventKind::NotificationRemoved {
            notification_id,
            reason,
        });
    }

    pub fn log_warning(&self, event: WarningEvent) {
        self.log(DiagnosticEventKind::Warning { event });
    }

    pub fn log_error(&self, event: ErrorEvent) {
        self.log(DiagnosticEventKind::Error { event });
    }

    /// Attempts to send an event, returning an error if the channel is full.
    ///
    /// # Errors
    ///
    /// Returns `TrySendError::Full` if the internal channel buffer is full,
    /// or `TrySendError::Disconnected` if the collector has been dropped.
    pub fn try_log(&self, kind: DiagnosticEventKind) -> Result<(), TrySendError<DiagnosticEvent>> {
        self.event_tx.try_send(DiagnosticEvent::new(kind))
    }
}

/// Central collector for diagnostic events.
pub struct DiagnosticsCollector {
    buffer: CircularBuffer<DiagnosticEvent>,
    event_rx: Receiver<DiagnosticEvent>,
    /// Kept to mint new handles.
    event_tx: Sender<DiagnosticEvent>,
    /// Monotonic start, for relative event timestamps.
    collection_started_at: Instant,
    /// Wall-clock start, for report metadata.
    collection_started_at_utc: DateTime<Utc>,
}

impl DiagnosticsCollector {
    /// Creates a collector whose channel holds as many undrained events as
    /// the buffer keeps, so nothing the buffer could store is dropped
    /// between two `process_pending` calls.
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self::with_channel_capacity(capacity, capacity.value())
    }

    /// Creates a collector whose channel holds at most `channel_capacity`
    /// undrained events.
    #[must_use]
    pub fn with_channel_capacity(capacity: BufferCapacity, channel_capacity: usize) -> Self {
        let (event_tx, event_rx) = bounded(channel_capacity);

        Self {
            buffer: CircularBuffer::new(capacity),
            event_rx,
            event_tx,
            collection_started_at: Instant::now(),
            collection_started_at_utc: Utc::now(),
        }
    }

    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Drains the channel into the buffer.
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.buffer.push(event);
        }
    }

    /// Records an event directly, bypassing the channel.
    pub fn log(&mut self, kind: DiagnosticEventKind) {
        self.buffer.push(DiagnosticEvent::new(kind));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns an iterator over all stored events (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[must_use]
    pub fn collection_duration(&self) -> Duration {
        self.collection_started_at.elapsed()
    }

    /// Builds a report from the events currently stored.
    #[must_use]
    pub fn build_report(&self) -> DiagnosticReport {
        let collection_duration_ms =
            u64::try_from(self.collection_duration().as_millis()).unwrap_or(u64::MAX);

        let events: Vec<SerializableEvent> = self
            .buffer
            .iter()
            .map(|event| {
                SerializableEvent::new(
                    event.timestamp,
                    self.collection_started_at,
                    event.kind.clone(),
                )
            })
            .collect();

        let metadata = ReportMetadata::new(
            self.collection_started_at_utc,
            collection_duration_ms,
            events.len(),
        );

        DiagnosticReport::new(metadata, events)
    }

    /// Exports all stored events as a pretty-printed JSON report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.build_report())
    }

    /// Writes the JSON report to `path` atomically.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Io` if file operations fail and
    /// `ExportError::Serialization` if JSON serialization fails.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let path = path.as_ref();
        let json = self.export_json()?;

        write_atomic(path, &json)?;

        Ok(path.to_path_buf())
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared(count: usize) -> DiagnosticEventKind {
        DiagnosticEventKind::NotificationsCleared { count }
    }

    #[test]
    fn handle_events_arrive_after_process_pending() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();

        handle.log_notification_shown(1, "info", 3000);
        handle.log_notification_removed(1, RemovalReason::Expired);
        assert!(collector.is_empty());

        collector.process_pending();
        assert_eq!(collector.len(), 2);

        let kinds: Vec<_> = collector.iter().map(|event| event.kind.clone()).collect();
        assert_eq!(
            kinds[1],
            DiagnosticEventKind::NotificationRemoved {
                notification_id: 1,
                reason: RemovalReason::Expired,
            }
        );
    }

    #[test]
    fn handle_is_usable_from_another_thread() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();

        std::thread::spawn(move || handle.log(cleared(4)))
            .join()
            .expect("thread should finish");

        collector.process_pending();
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn full_channel_drops_events_without_blocking() {
        let mut collector = DiagnosticsCollector::with_channel_capacity(BufferCapacity::default(), 2);
        let handle = collector.handle();

        handle.log(cleared(1));
        handle.log(cleared(2));
        handle.log(cleared(3));
        assert!(matches!(
            handle.try_log(cleared(4)),
            Err(TrySendError::Full(_))
        ));

        collector.process_pending();
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn channel_holds_as_many_events_as_the_buffer() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();

        for id in 0..60 {
            handle.log_notification_shown(id, "info", 3000);
        }
        for id in 0..60 {
            handle.log_notification_removed(id, RemovalReason::Expired);
        }

        collector.process_pending();
        assert_eq!(collector.len(), 120);
        let removed = collector
            .iter()
            .filter(|event| matches!(event.kind, DiagnosticEventKind::NotificationRemoved { .. }))
            .count();
        assert_eq!(removed, 60);
    }

    #[test]
    fn report_duration_tracks_collection_time() {
        let collector = DiagnosticsCollector::default();
        let elapsed = collector.collection_duration();

        let report = collector.build_report();

        assert!(u128::from(report.metadata.collection_duration_ms) >= elapsed.as_millis());
    }

    #[test]
    fn buffer_evicts_oldest_beyond_capacity() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::new(0));
        let capacity = collector.capacity();

        for count in 0..capacity + 5 {
            collector.log(cleared(count));
        }

        assert_eq!(collector.len(), capacity);
        let first = collector.iter().next().map(|event| event.kind.clone());
        assert_eq!(first, Some(cleared(5)));
    }

    #[test]
    fn export_json_contains_metadata_summary_and_events() {
        let mut collector = DiagnosticsCollector::default();
        collector.log(DiagnosticEventKind::NotificationShown {
            notification_id: 3,
            category: "warning".to_string(),
            duration_ms: 500,
        });
        collector.log(DiagnosticEventKind::Warning {
            event: WarningEvent {
                notification_id: 3,
                message: "GPS signal weak".to_string(),
            },
        });

        let json = collector.export_json().expect("export should succeed");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["metadata"]["event_count"], 2);
        assert_eq!(value["summary"]["notifications_shown"], 1);
        assert_eq!(value["summary"]["warnings"], 1);
        assert_eq!(value["events"][1]["event"]["message"], "GPS signal weak");
    }

    #[test]
    fn export_to_file_writes_report() {
        let temp_dir = tempfile::tempdir().expect("should create temp dir");
        let path = temp_dir.path().join("report.json");
        let mut collector = DiagnosticsCollector::default();
        collector.log(cleared(2));

        let written = collector.export_to_file(&path).expect("export should succeed");

        assert_eq!(written, path);
        let content = std::fs::read_to_string(&path).expect("should read report");
        let report: DiagnosticReport = serde_json::from_str(&content).expect("valid report");
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].kind, cleared(2));
    }

    #[test]
    fn clear_empties_buffer() {
        let mut collector = DiagnosticsCollector::default();
        collector.log(cleared(1));
        collector.clear();
        assert!(collector.is_empty());
    }
}
