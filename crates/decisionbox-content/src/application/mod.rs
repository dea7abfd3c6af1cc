//! Catalog loading.

pub mod catalog;
