//! Settings for log navigation

use crate::cache::{CachedProperty, DocumentsCache};
use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_LONG_OPERATION_MS: u64 = 1000;

/// Long operation highlighting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongOperationSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Gaps strictly longer than this are reported
    #[serde(default = "default_duration_in_ms")]
    pub duration_in_ms: u64,
}

fn default_duration_in_ms() -> u64 {
    DEFAULT_LONG_OPERATION_MS
}

impl Default for LongOperationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            duration_in_ms: DEFAULT_LONG_OPERATION_MS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PridologSettings {
    #[serde(default)]
    pub show_long_operations: LongOperationSettings,
}

/// Settings document, shaped like the editor configuration section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub pridolog: PridologSettings,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/pridolog/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pridolog").join("settings.json"))
    }

    /// Load settings from JSON. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Threshold for long operations, or `None` when the analysis is disabled
    pub fn long_operation_threshold(&self) -> Option<u64> {
        let long_ops = &self.pridolog.show_long_operations;
        long_ops.enabled.then_some(long_ops.duration_in_ms)
    }
}

/// Tracks the active settings and invalidates cached results they affect
#[derive(Debug, Default)]
pub struct SettingsTracker {
    current: Settings,
}

impl SettingsTracker {
    pub fn new(current: Settings) -> Self {
        Self { current }
    }

    pub fn current(&self) -> &Settings {
        &self.current
    }

    /// Install new settings. Returns true if cached long operations were dropped.
    pub fn apply(&mut self, settings: Settings, cache: &DocumentsCache) -> bool {
        let changed = settings.long_operation_threshold() != self.current.long_operation_threshold();
        if changed {
            tracing::debug!(
                threshold = ?settings.long_operation_threshold(),
                "Long operation threshold changed"
            );
            cache.drop_property(CachedProperty::LongOperations);
        }
        self.current = settings;
        changed
    }
}
