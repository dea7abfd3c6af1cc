//! Shared test helpers for reader integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use decisionbox_app::{AppConfig, LogFormat};
use decisionbox_test_support::fixtures;

/// Writes the fixture catalog as JSON into `dir` and returns its path.
pub fn write_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("stories.json");
    std::fs::write(&path, fixtures::catalog_json()).unwrap();
    path
}

/// Configuration pointing at a fixture catalog and a data directory, both
/// inside `dir`.
pub fn config_in(dir: &Path) -> AppConfig {
    AppConfig {
        catalog_path: write_catalog(dir),
        data_dir: dir.join("data"),
        log_format: LogFormat::Pretty,
    }
}

/// Reads a persisted key straight from the data directory.
pub fn read_saved(config: &AppConfig, file_name: &str) -> Option<serde_json::Value> {
    let raw = std::fs::read_to_string(config.data_dir.join(file_name)).ok()?;
    Some(serde_json::from_str(&raw).unwrap())
}

/// File holding the progress array.
pub const PROGRESS_FILE: &str = "_40decision_5Fbox_5Fprogress.json";

/// File holding the settings object.
pub const SETTINGS_FILE: &str = "_40decision_5Fbox_5Fsettings.json";
