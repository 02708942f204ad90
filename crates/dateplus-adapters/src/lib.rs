//! Infrastructure adapters for dateplus.
//!
//! This crate implements the ports defined in `dateplus_core::application::ports`.
//! It contains all storage concerns.

pub mod entity_store;

// Re-export commonly used adapters
pub use entity_store::{InMemoryEntityStore, TimestampedRecord};
