//! dateplus Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for dateplus, a
//! lenient date-time value object with validation, following hexagonal
//! (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          dateplus-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (DateService, PersistListener)      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │     (Driven: Timestamped, EntityStore)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    dateplus-adapters (Infrastructure)   │
//! │          (InMemoryEntityStore)          │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (DateValue, DateParts, Interval, ...)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use dateplus_core::prelude::*;
//!
//! let mut date = DateValue::from_time("2020-06-15 14:30", "Europe/Paris", &Settings::default());
//! assert!(!date.has_errors());
//! assert_eq!(date.format("D, d M Y").as_deref(), Some("Mon, 15 Jun 2020"));
//!
//! let broken = DateValue::from_time("2011-02-30", "UTC", &Settings::default());
//! assert_eq!(broken.errors(), ["The date is invalid."]);
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{DateService, EntityStore, PersistListener, Timestamped};
    pub use crate::domain::{
        DateError, DateParts, DateValue, Interval, Settings, TimeZoneInput, default_timezone,
        set_default_timezone,
    };
    pub use crate::error::{DatePlusError, DatePlusResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
