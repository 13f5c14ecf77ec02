// SPDX-License-Identifier: MPL-2.0
//! Writing diagnostic reports to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

/// Errors that can occur during diagnostic report export.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error during file operations.
    Io(io::Error),
    /// JSON serialization error.
    Serialization(serde_json::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Serialization(err) => write!(f, "serialization error: {err}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

/// Generates a default filename for diagnostic reports.
///
/// Format: `ciclomappa_diagnostics_YYYYMMDD_HHMMSS.json` in local time.
#[must_use]
pub fn generate_default_filename() -> String {
    let now = Local::now();
    format!(
        "ciclomappa_diagnostics_{}.json",
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Writes content to a file atomically.
///
/// Writes a `.json.tmp` sibling first, then renames it over `path`.
///
/// # Errors
///
/// Returns an error if writing or renaming fails.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("json.tmp");

    fs::write(&temp_path, content)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}

/// Documents folder if available, otherwise the current directory.
#[must_use]
pub fn default_export_directory() -> PathBuf {
    dirs::document_dir().unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
}

/// Picks where a report is written.
///
/// An existing directory (or `None`, meaning [`default_export_directory`])
/// gets a [`generate_default_filename`] file inside it; any other path is
/// used as is.
#[must_use]
pub fn resolve_export_path(target: Option<&Path>) -> PathBuf {
    match target {
        Some(path) if !path.is_dir() => path.to_path_buf(),
        Some(dir) => dir.join(generate_default_filename()),
        None => default_export_directory().join(generate_default_filename()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_error_io_displays_correctly() {
        let err = ExportError::Io(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert_eq!(err.to_string(), "I/O error: missing");
    }

    #[test]
    fn export_error_keeps_source() {
        let err: ExportError = io::Error::other("boom").into();
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn generate_default_filename_has_correct_format() {
        let filename = generate_default_filename();
        assert!(filename.starts_with("ciclomappa_diagnostics_"));
        assert!(filename.ends_with(".json"));
        // prefix + YYYYMMDD_HHMMSS + .json
        assert_eq!(filename.len(), "ciclomappa_diagnostics_".len() + 15 + 5);
    }

    #[test]
    fn resolve_export_path_keeps_file_paths() {
        let temp_dir = tempfile::tempdir().expect("should create temp dir");
        let path = temp_dir.path().join("report.json");

        assert_eq!(resolve_export_path(Some(&path)), path);
    }

    #[test]
    fn resolve_export_path_names_file_inside_directory() {
        let temp_dir = tempfile::tempdir().expect("should create temp dir");

        let path = resolve_export_path(Some(temp_dir.path()));

        assert_eq!(path.parent(), Some(temp_dir.path()));
        let name = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
        assert!(name.starts_with("ciclomappa_diagnostics_"));
    }

    #[test]
    fn resolve_export_path_defaults_to_export_directory() {
        let path = resolve_export_path(None);

        assert_eq!(path.parent(), Some(default_export_directory().as_path()));
    }

    #[test]
    fn atomic_write_creates_file() {
        let temp_dir = tempfile::tempdir().expect("should create temp dir");
        let path = temp_dir.path().join("report.json");

        write_atomic(&path, r#"{"test": true}"#).expect("write should succeed");

        let content = fs::read_to_string(&path).expect("should read file");
        assert_eq!(content, r#"{"test": true}"#);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn atomic_write_into_missing_directory_fails() {
        let temp_dir = tempfile::tempdir().expect("should create temp dir");
        let path = temp_dir.path().join("missing").join("report.json");

        assert!(write_atomic(&path, "{}").is_err());
    }
}
