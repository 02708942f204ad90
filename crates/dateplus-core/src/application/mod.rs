//! Application layer for dateplus.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (DateService, PersistListener)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! date logic itself. All date rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{DateService, PersistListener};

// Re-export port traits (for adapter implementation)
pub use ports::{EntityStore, Timestamped};

pub use error::ApplicationError;
