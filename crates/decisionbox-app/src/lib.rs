//! Decision Box — application shell.
//!
//! Reads configuration from the environment, installs logging and exposes
//! [`ReaderApp`], the single entry point a presentation layer drives.

pub mod config;
pub mod error;
pub mod reader;
pub mod telemetry;

pub use config::{AppConfig, LogFormat};
pub use error::AppError;
pub use reader::ReaderApp;
pub use telemetry::init_tracing;
