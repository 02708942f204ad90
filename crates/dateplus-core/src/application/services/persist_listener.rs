//! Persist Listener - stamps entities before they are written.
//!
//! Called by store adapters right before an entity is persisted:
//! 1. Set the creation date on new entities (or ones that never had one)
//! 2. Refresh the modification date on every write

use tracing::{debug, instrument, warn};

use crate::{
    application::ports::Timestamped,
    domain::{DateValue, Settings, TimeZoneInput},
};

/// Pre-persist hook that keeps creation and modification dates current.
#[derive(Debug, Clone, Default)]
pub struct PersistListener {
    timezone: TimeZoneInput,
    settings: Settings,
}

impl PersistListener {
    /// Create a listener that stamps dates in `timezone`.
    pub fn new(timezone: impl Into<TimeZoneInput>, settings: Settings) -> Self {
        Self {
            timezone: timezone.into(),
            settings,
        }
    }

    /// Stamp `entity` before it is written.
    ///
    /// `is_new` is true when the entity has never been stored.
    #[instrument(skip_all, fields(is_new = is_new, timezone = %self.timezone))]
    pub fn pre_persist<E>(&self, entity: &mut E, is_new: bool)
    where
        E: Timestamped + ?Sized,
    {
        if entity.has_creation_date_field() && (is_new || entity.creation_date().is_none()) {
            let now = self.now();
            debug!(creation_date = %now, "Setting creation date");
            entity.set_creation_date(now);
        }

        if entity.has_modification_date_field() {
            let now = self.now();
            debug!(modification_date = %now, "Setting modification date");
            entity.set_modification_date(now);
        }
    }

    fn now(&self) -> DateValue {
        let now = DateValue::from_time("now", self.timezone.clone(), &self.settings);
        if now.has_errors() {
            warn!(errors = ?now.errors(), "Stamping with an invalid date");
        }
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTimestamped;
    use mockall::predicate::function;

    fn listener() -> PersistListener {
        PersistListener::new("UTC", Settings::default())
    }

    fn valid_date() -> impl Fn(&DateValue) -> bool {
        |date: &DateValue| !date.has_errors() && date.instant().is_some()
    }

    #[test]
    fn new_entity_gets_both_dates() {
        let mut entity = MockTimestamped::new();
        entity.expect_has_creation_date_field().return_const(true);
        entity.expect_creation_date().return_const(None::<DateValue>);
        entity
            .expect_set_creation_date()
            .with(function(valid_date()))
            .times(1)
            .return_const(());
        entity.expect_has_modification_date_field().return_const(true);
        entity
            .expect_set_modification_date()
            .with(function(valid_date()))
            .times(1)
            .return_const(());

        listener().pre_persist(&mut entity, true);
    }

    #[test]
    fn existing_creation_date_is_kept_on_update() {
        let stamped = DateValue::from_time("2020-01-01", "UTC", &Settings::default());
        let mut entity = MockTimestamped::new();
        entity.expect_has_creation_date_field().return_const(true);
        entity.expect_creation_date().return_const(Some(stamped));
        entity.expect_set_creation_date().times(0);
        entity.expect_has_modification_date_field().return_const(true);
        entity
            .expect_set_modification_date()
            .times(1)
            .return_const(());

        listener().pre_persist(&mut entity, false);
    }

    #[test]
    fn update_fills_missing_creation_date() {
        let mut entity = MockTimestamped::new();
        entity.expect_has_creation_date_field().return_const(true);
        entity.expect_creation_date().return_const(None::<DateValue>);
        entity.expect_set_creation_date().times(1).return_const(());
        entity.expect_has_modification_date_field().return_const(false);
        entity.expect_set_modification_date().times(0);

        listener().pre_persist(&mut entity, false);
    }

    #[test]
    fn entities_without_fields_are_untouched() {
        let mut entity = MockTimestamped::new();
        entity.expect_has_creation_date_field().return_const(false);
        entity.expect_has_modification_date_field().return_const(false);
        entity.expect_set_creation_date().times(0);
        entity.expect_set_modification_date().times(0);

        listener().pre_persist(&mut entity, true);
    }

    #[test]
    fn stamps_in_configured_zone() {
        let mut entity = MockTimestamped::new();
        entity.expect_has_creation_date_field().return_const(false);
        entity.expect_has_modification_date_field().return_const(true);
        entity
            .expect_set_modification_date()
            .withf(|date| date.timezone() == chrono_tz::Tz::Asia__Tokyo)
            .times(1)
            .return_const(());

        PersistListener::new("Asia/Tokyo", Settings::default()).pre_persist(&mut entity, true);
    }
}
