//! Decision Box — Story Catalog.
//!
//! Responsible for the immutable story graph: stories, chapters and the
//! choices linking them, loaded once from a bundled dataset and validated
//! before anything can traverse it.

pub mod application;
pub mod domain;

pub use application::catalog::{Catalog, CatalogError, CatalogFormat};
pub use domain::story::{Chapter, Choice, EndingType, Story};
