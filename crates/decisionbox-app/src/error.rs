//! Decision Box — application error types.

use decisionbox_content::CatalogError;
use decisionbox_core::error::DomainError;
use thiserror::Error;

/// Startup errors for the reader application.
///
/// Nothing after startup is fatal; once the app is running, failures are
/// reported as `DomainError`s from individual operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The bundled story catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The storage directory could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] DomainError),

    /// Reading the catalog file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
