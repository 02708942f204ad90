//! In-memory entity store that stamps entities on write.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use dateplus_core::{
    application::{ApplicationError, EntityStore, PersistListener, Timestamped},
    error::DatePlusResult,
};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Thread-safe in-memory entity store.
///
/// Every write goes through the [`PersistListener`] first, so stored
/// entities always carry current creation and modification dates.
#[derive(Clone)]
pub struct InMemoryEntityStore<E> {
    inner: Arc<RwLock<HashMap<Uuid, E>>>,
    listener: PersistListener,
}

impl<E> InMemoryEntityStore<E> {
    /// Create an empty store stamping in the default timezone.
    pub fn new() -> Self {
        Self::with_listener(PersistListener::default())
    }

    /// Create an empty store with a configured listener.
    pub fn with_listener(listener: PersistListener) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            listener,
        }
    }

    /// Remove every entity.
    pub fn clear(&self) -> DatePlusResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.clear();
        Ok(())
    }
}

impl<E> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EntityStore<E> for InMemoryEntityStore<E>
where
    E: Timestamped + Clone + Send + Sync,
{
    #[instrument(skip_all)]
    fn persist(&self, mut entity: E) -> DatePlusResult<Uuid> {
        self.listener.pre_persist(&mut entity, true);

        let id = Uuid::new_v4();
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(id, entity);

        debug!(%id, "Entity persisted");
        Ok(id)
    }

    #[instrument(skip(self, entity))]
    fn update(&self, id: Uuid, mut entity: E) -> DatePlusResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let slot = inner
            .get_mut(&id)
            .ok_or(ApplicationError::EntityNotFound { id })?;
        self.listener.pre_persist(&mut entity, false);
        *slot = entity;

        debug!("Entity updated");
        Ok(())
    }

    fn get(&self, id: Uuid) -> DatePlusResult<E> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner
            .get(&id)
            .cloned()
            .ok_or_else(|| ApplicationError::EntityNotFound { id }.into())
    }

    fn remove(&self, id: Uuid) -> DatePlusResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ApplicationError::EntityNotFound { id }.into())
    }

    fn len(&self) -> DatePlusResult<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.len())
    }
}
