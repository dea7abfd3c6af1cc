//! Application configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

/// Path to the bundled stories file. Required.
pub const CATALOG_VAR: &str = "DECISIONBOX_CATALOG";
/// Directory the reader's progress and settings are kept in.
pub const DATA_DIR_VAR: &str = "DECISIONBOX_DATA_DIR";
/// `json` or `pretty`.
pub const LOG_FORMAT_VAR: &str = "DECISIONBOX_LOG_FORMAT";

const DEFAULT_DATA_DIR: &str = "./data";

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(AppError::Config(format!(
                "{LOG_FORMAT_VAR} must be `json` or `pretty`, got `{other}`"
            ))),
        }
    }
}

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// The bundled stories file; `.yaml`/`.yml` is read as YAML.
    pub catalog_path: PathBuf,
    /// Where progress and settings are persisted.
    pub data_dir: PathBuf,
    /// Log rendering.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DECISIONBOX_CATALOG` is unset or
    /// `DECISIONBOX_LOG_FORMAT` has an unknown value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let catalog_path = lookup(CATALOG_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| AppError::Config(format!("{CATALOG_VAR} must be set")))?;
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(v) => v.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            catalog_path,
            data_dir,
            log_format,
        })
    }
}
