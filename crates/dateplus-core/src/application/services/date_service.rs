//! Date Service - construction use cases behind the command line.
//!
//! Wraps the `DateValue` constructors with the caller's default timezone and
//! settings, and turns hard domain failures into `DatePlusError`.

use chrono::Weekday;
use tracing::{debug, instrument};

use crate::{
    domain::{DateError, DateParts, DateValue, Settings, TimeZoneInput},
    error::DatePlusResult,
};

/// Builds dates with a fixed timezone and settings.
#[derive(Debug, Clone, Default)]
pub struct DateService {
    timezone: TimeZoneInput,
    settings: Settings,
}

impl DateService {
    pub fn new(timezone: impl Into<TimeZoneInput>, settings: Settings) -> Self {
        Self {
            timezone: timezone.into(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timezone(&self) -> &TimeZoneInput {
        &self.timezone
    }

    /// Read free text. Never fails; the returned value may carry errors.
    #[instrument(skip(self), fields(timezone = %self.timezone))]
    pub fn parse(&self, time: &str) -> DateValue {
        let value = DateValue::from_time(time, self.timezone.clone(), &self.settings);
        if value.has_errors() {
            debug!(errors = ?value.errors(), "Input rejected");
        }
        value
    }

    #[instrument(skip(self), fields(timezone = %self.timezone))]
    pub fn from_format(&self, format: &str, time: &str) -> DatePlusResult<DateValue> {
        Ok(DateValue::from_format(
            format,
            time,
            self.timezone.clone(),
            &self.settings,
        )?)
    }

    #[instrument(skip(self), fields(timezone = %self.timezone))]
    pub fn from_parts(&self, parts: &DateParts) -> DatePlusResult<DateValue> {
        Ok(DateValue::from_parts(
            parts,
            self.timezone.clone(),
            &self.settings,
        )?)
    }

    #[instrument(skip(self), fields(timezone = %self.timezone))]
    pub fn from_timestamp(&self, timestamp: &str) -> DatePlusResult<DateValue> {
        Ok(DateValue::from_timestamp_str(
            timestamp,
            self.timezone.clone(),
            &self.settings,
        )?)
    }

    #[instrument(skip(self), fields(timezone = %self.timezone))]
    pub fn nth_weekday(
        &self,
        occurrence: u32,
        weekday: Weekday,
        month: Option<u32>,
        year: Option<i32>,
    ) -> DatePlusResult<DateValue> {
        Ok(DateValue::from_day_of_month_in(
            occurrence,
            weekday,
            month,
            year,
            self.timezone.clone(),
            &self.settings,
        )?)
    }

    /// Which occurrence of its weekday `time` falls on within its month.
    #[instrument(skip(self), fields(timezone = %self.timezone))]
    pub fn occurrence(&self, time: &str) -> DatePlusResult<(DateValue, u32)> {
        let value = self.parse(time);
        match value.day_occurrence_of_month() {
            Some(n) if !value.has_errors() => Ok((value, n)),
            _ => Err(DateError::Unresolved {
                errors: value.errors().to_vec(),
            }
            .into()),
        }
    }
}
