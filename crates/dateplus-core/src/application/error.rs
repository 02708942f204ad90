//! Application layer errors.
//!
//! These errors represent failures in orchestration, not date logic.
//! Date errors are `DateError` from `crate::domain`.

use thiserror::Error;
use uuid::Uuid;

use crate::error::ErrorCategory;

/// Errors that occur while coordinating persistence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// Store access failed (lock poisoned).
    #[error("Entity store error")]
    StoreLockError,

    /// No entity is stored under this id.
    #[error("No entity with id {id}")]
    EntityNotFound { id: Uuid },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::StoreLockError => vec![
                "The entity store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::EntityNotFound { id } => vec![
                format!("Nothing was persisted under {id}"),
                "Persist the entity before updating it".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::StoreLockError => ErrorCategory::Internal,
            Self::EntityNotFound { .. } => ErrorCategory::NotFound,
        }
    }
}
