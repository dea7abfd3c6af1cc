//! Decision Box — Storage.
//!
//! Durable implementations of the `KeyValueStore` port.

pub mod file_store;
