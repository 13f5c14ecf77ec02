// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use ciclomappa::config::{self, Config};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Keep toasts on screen for five seconds
//! config.toast_duration_ms = Some(5000);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

mod defaults;

pub use defaults::*;

use crate::domain::{BufferCapacity, ToastDuration};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "CicloMappa";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Lifetime of toasts enqueued without an explicit duration.
    #[serde(default)]
    pub toast_duration_ms: Option<u64>,
    /// Platform name reported instead of asking the native bridge.
    #[serde(default)]
    pub platform_override: Option<String>,
    #[serde(default)]
    pub diagnostics_buffer_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toast_duration_ms: Some(DEFAULT_TOAST_DURATION_MS),
            platform_override: None,
            diagnostics_buffer_capacity: Some(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY),
        }
    }
}

impl Config {
    /// Toast lifetime to use when a caller does not pick one.
    #[must_use]
    pub fn toast_duration(&self) -> ToastDuration {
        self.toast_duration_ms
            .map_or_else(ToastDuration::default, ToastDuration::from_millis)
    }

    #[must_use]
    pub fn diagnostics_capacity(&self) -> BufferCapacity {
        self.diagnostics_buffer_capacity
            .map_or_else(BufferCapacity::default, BufferCapacity::new)
    }

    /// Configured platform override, ignoring blank values.
    #[must_use]
    pub fn platform_override(&self) -> Option<&str> {
        self.platform_override
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads settings from `path`. Unparseable TOML yields the defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            toast_duration_ms: Some(1500),
            platform_override: Some("android".to_string()),
            diagnostics_buffer_capacity: Some(250),
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn load_from_missing_path_is_an_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let result = load_from_path(&temp_dir.path().join("missing.toml"));
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let config: Config = toml::from_str("toast_duration_ms = 800").expect("valid toml");
        assert_eq!(config.toast_duration_ms, Some(800));
        assert!(config.platform_override.is_none());
        assert!(config.diagnostics_buffer_capacity.is_none());
    }

    #[test]
    fn toast_duration_falls_back_to_default() {
        let config = Config {
            toast_duration_ms: None,
            ..Config::default()
        };
        assert_eq!(config.toast_duration().as_millis(), DEFAULT_TOAST_DURATION_MS);
    }

    #[test]
    fn toast_duration_clamps_zero() {
        let config = Config {
            toast_duration_ms: Some(0),
            ..Config::default()
        };
        assert_eq!(config.toast_duration().as_millis(), MIN_TOAST_DURATION_MS);
    }

    #[test]
    fn toast_duration_clamps_to_maximum() {
        let config = Config {
            toast_duration_ms: Some(u64::MAX),
            ..Config::default()
        };
        assert_eq!(config.toast_duration().as_millis(), MAX_TOAST_DURATION_MS);
    }

    #[test]
    fn diagnostics_capacity_is_clamped() {
        let config = Config {
            diagnostics_buffer_capacity: Some(5),
            ..Config::default()
        };
        assert_eq!(
            config.diagnostics_capacity().value(),
            MIN_DIAGNOSTICS_BUFFER_CAPACITY
        );
    }

    #[test]
    fn blank_platform_override_is_ignored() {
        let config = Config {
            platform_override: Some("   ".to_string()),
            ..Config::default()
        };
        assert!(config.platform_override().is_none());

        let config = Config {
            platform_override: Some(" ios ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.platform_override(), Some("ios"));
    }
}
