//! Reader display settings.

use std::sync::Arc;

use decisionbox_core::storage::{SETTINGS_KEY, SnapshotSink};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Reading text size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    /// 16pt.
    Small,
    /// 18pt.
    #[default]
    Medium,
    /// 20pt.
    Large,
}

impl FontSize {
    /// Point size used for chapter text.
    #[must_use]
    pub fn points(self) -> u8 {
        match self {
            Self::Small => 16,
            Self::Medium => 18,
            Self::Large => 20,
        }
    }
}

/// Colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background.
    Light,
    /// Dark background.
    #[default]
    Dark,
}

/// Persisted reader settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Text size.
    pub font_size: FontSize,
    /// Colour scheme.
    pub theme: Theme,
}

/// A partial settings update; absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    /// New text size.
    pub font_size: Option<FontSize>,
    /// New colour scheme.
    pub theme: Option<Theme>,
}

impl Settings {
    /// Returns these settings with the patch applied.
    #[must_use]
    pub fn merged(self, patch: SettingsPatch) -> Self {
        Self {
            font_size: patch.font_size.unwrap_or(self.font_size),
            theme: patch.theme.unwrap_or(self.theme),
        }
    }
}

/// Current settings plus the sink their snapshots go to.
pub struct SettingsStore {
    settings: Settings,
    sink: Arc<dyn SnapshotSink>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SettingsStore {
    /// Wraps settings loaded at startup. Nothing is written.
    #[must_use]
    pub fn new(settings: Settings, sink: Arc<dyn SnapshotSink>) -> Self {
        Self { settings, sink }
    }

    /// The current settings.
    #[must_use]
    pub fn get(&self) -> Settings {
        self.settings
    }

    /// Merges `patch` into the current settings and persists the result.
    pub fn update(&mut self, patch: SettingsPatch) -> Settings {
        self.settings = self.settings.merged(patch);
        match serde_json::to_string(&self.settings) {
            Ok(payload) => self.sink.submit(SETTINGS_KEY, payload),
            Err(e) => error!(error = %e, "failed to serialize settings"),
        }
        self.settings
    }

    /// Returns to defaults in memory only; used after storage was wiped.
    pub fn reset(&mut self) {
        self.settings = Settings::default();
    }
}
