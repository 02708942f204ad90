//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "stamp an entity" or "read a date".

pub mod date_service;
pub mod persist_listener;

pub use date_service::DateService;
pub use persist_listener::PersistListener;
