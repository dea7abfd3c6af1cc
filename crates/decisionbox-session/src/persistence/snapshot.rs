//! Reading session state back from durable storage.
//!
//! Startup must never fail because of what is (or is not) on disk: a
//! missing, unreadable or malformed snapshot yields the empty default and a
//! warning.

use decisionbox_core::storage::{KeyValueStore, PROGRESS_KEY, SETTINGS_KEY};
use decisionbox_narrative::ProgressRecord;
use tracing::{info, instrument, warn};

use crate::domain::settings::{Settings, SettingsPatch};

/// Loads the persisted progress records, or none.
///
/// Records are decoded one at a time; an unreadable record is skipped and
/// the rest are kept.
#[instrument(skip_all)]
pub async fn load_progress(store: &dyn KeyValueStore) -> Vec<ProgressRecord> {
    let raw = match store.get(PROGRESS_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "could not read saved progress, starting empty");
            return Vec::new();
        }
    };

    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "saved progress is malformed, starting empty");
            return Vec::new();
        }
    };

    // One unreadable record must not cost the reader every other story.
    let total = entries.len();
    let records: Vec<ProgressRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            serde_json::from_value::<ProgressRecord>(entry)
                .inspect_err(|e| warn!(index, error = %e, "unreadable progress record skipped"))
                .ok()
        })
        .collect();

    info!(records = records.len(), skipped = total - records.len(), "saved progress loaded");
    records
}

/// Loads the persisted settings, filling anything absent with defaults.
#[instrument(skip_all)]
pub async fn load_settings(store: &dyn KeyValueStore) -> Settings {
    let raw = match store.get(SETTINGS_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Settings::default(),
        Err(e) => {
            warn!(error = %e, "could not read saved settings, using defaults");
            return Settings::default();
        }
    };

    match serde_json::from_str::<SettingsPatch>(&raw) {
        Ok(patch) => Settings::default().merged(patch),
        Err(e) => {
            warn!(error = %e, "saved settings are malformed, using defaults");
            Settings::default()
        }
    }
}

/// Removes both the progress and the settings snapshot.
///
/// Failures are logged, not returned: the caller has already reset its
/// in-memory state.
#[instrument(skip_all)]
pub async fn clear_all_data(store: &dyn KeyValueStore) {
    match store.remove(&[PROGRESS_KEY, SETTINGS_KEY]).await {
        Ok(()) => info!("all saved data cleared"),
        Err(e) => warn!(error = %e, "failed to clear saved data"),
    }
}
