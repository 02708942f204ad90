//! A ready-made [`Timestamped`] wrapper for plain data.

use dateplus_core::{application::Timestamped, domain::DateValue};

/// Wraps `T` with creation and modification dates.
///
/// Both fields are declared; use it when an entity has no date columns of
/// its own.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampedRecord<T> {
    pub data: T,
    creation_date: Option<DateValue>,
    modification_date: Option<DateValue>,
}

impl<T> TimestampedRecord<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            creation_date: None,
            modification_date: None,
        }
    }

    pub fn creation(&self) -> Option<&DateValue> {
        self.creation_date.as_ref()
    }

    pub fn modification(&self) -> Option<&DateValue> {
        self.modification_date.as_ref()
    }
}

impl<T> Timestamped for TimestampedRecord<T> {
    fn has_creation_date_field(&self) -> bool {
        true
    }

    fn creation_date(&self) -> Option<DateValue> {
        self.creation_date.clone()
    }

    fn set_creation_date(&mut self, date: DateValue) {
        self.creation_date = Some(date);
    }

    fn has_modification_date_field(&self) -> bool {
        true
    }

    fn set_modification_date(&mut self, date: DateValue) {
        self.modification_date = Some(date);
    }
}
