//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from persistence.
//! The `dateplus-adapters` crate provides implementations.

use uuid::Uuid;

use crate::domain::DateValue;
use crate::error::DatePlusResult;

/// An entity that may carry creation and modification dates.
///
/// The `has_*_field` methods report whether the entity declares the field at
/// all; entities without one are left untouched by the persist hook.
#[cfg_attr(test, mockall::automock)]
pub trait Timestamped {
    fn has_creation_date_field(&self) -> bool;

    /// The current creation date, if one was ever set.
    fn creation_date(&self) -> Option<DateValue>;

    fn set_creation_date(&mut self, date: DateValue);

    fn has_modification_date_field(&self) -> bool;

    fn set_modification_date(&mut self, date: DateValue);
}

/// Port for entity storage.
///
/// Implemented by:
/// - `dateplus_adapters::InMemoryEntityStore` (in-process)
///
/// Implementations run the persist hook before every write: `persist` stamps
/// as a new entity, `update` as an existing one.
pub trait EntityStore<E>: Send + Sync {
    /// Store a new entity and return its id.
    fn persist(&self, entity: E) -> DatePlusResult<Uuid>;

    /// Replace the entity stored under `id`.
    fn update(&self, id: Uuid, entity: E) -> DatePlusResult<()>;

    /// Get a copy of the entity stored under `id`.
    fn get(&self, id: Uuid) -> DatePlusResult<E>;

    /// Remove the entity stored under `id`.
    fn remove(&self, id: Uuid) -> DatePlusResult<()>;

    /// Number of stored entities.
    fn len(&self) -> DatePlusResult<usize>;

    fn is_empty(&self) -> DatePlusResult<bool> {
        Ok(self.len()? == 0)
    }
}
