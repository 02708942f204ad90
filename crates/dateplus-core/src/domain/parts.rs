//! Date-time given as separate numeric parts.

use std::collections::HashMap;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{calendar::is_valid_date, error::DateError};

/// The six keys accepted by [`DateParts::from_map`], in significance order.
pub const PART_KEYS: [&str; 6] = ["year", "month", "day", "hour", "minute", "second"];

/// Year, month, day, hour, minute and second, each optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DateParts {
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub day: Option<i64>,
    pub hour: Option<i64>,
    pub minute: Option<i64>,
    pub second: Option<i64>,
}

impl DateParts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(mut self, year: i64) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: i64) -> Self {
        self.month = Some(month);
        self
    }

    pub fn day(mut self, day: i64) -> Self {
        self.day = Some(day);
        self
    }

    pub fn hour(mut self, hour: i64) -> Self {
        self.hour = Some(hour);
        self
    }

    pub fn minute(mut self, minute: i64) -> Self {
        self.minute = Some(minute);
        self
    }

    pub fn second(mut self, second: i64) -> Self {
        self.second = Some(second);
        self
    }

    /// Build from string-keyed text, as submitted by a form.
    ///
    /// Unknown keys are ignored and empty strings count as absent. Anything
    /// else must be an integer.
    pub fn from_map<K, V>(map: &HashMap<K, V>) -> Result<Self, DateError>
    where
        K: AsRef<str> + Eq + std::hash::Hash,
        V: AsRef<str>,
    {
        let mut parts = Self::default();
        for (key, value) in map {
            let key = key.as_ref();
            let Some(slot) = parts.slot_mut(key) else {
                continue;
            };
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            let number = value.parse::<i64>().map_err(|_| DateError::InvalidParts {
                reason: format!("{key} '{value}' is not a whole number"),
            })?;
            *slot = Some(number);
        }
        Ok(parts)
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<i64>> {
        match key {
            "year" => Some(&mut self.year),
            "month" => Some(&mut self.month),
            "day" => Some(&mut self.day),
            "hour" => Some(&mut self.hour),
            "minute" => Some(&mut self.minute),
            "second" => Some(&mut self.second),
            _ => None,
        }
    }

    /// Fill missing parts.
    ///
    /// With `force_valid_date` the gaps become the current year, January,
    /// the 1st, and midnight; otherwise they stay absent.
    pub fn prepare(&self, force_valid_date: bool) -> Self {
        if !force_valid_date {
            return *self;
        }
        Self {
            year: self.year.or_else(|| Some(i64::from(Utc::now().year()))),
            month: self.month.or(Some(1)),
            day: self.day.or(Some(1)),
            hour: self.hour.or(Some(0)),
            minute: self.minute.or(Some(0)),
            second: self.second.or(Some(0)),
        }
    }

    /// Check the parts, explaining the first problem found.
    ///
    /// Year, month and day must all be present and name a real calendar
    /// date. Time parts may be absent, but present ones must be in range.
    pub fn validate(&self) -> Result<(), String> {
        let (Some(year), Some(month), Some(day)) = (self.year, self.month, self.day) else {
            return Err("year, month and day are all required".to_owned());
        };
        if !(1..=32767).contains(&year) || !is_valid_date(year, month, day) {
            return Err(format!("{year}-{month}-{day} is not a calendar date"));
        }
        if let Some(hour) = self.hour.filter(|h| !(0..=23).contains(h)) {
            return Err(format!("hour {hour} is outside 0-23"));
        }
        for (name, value) in [("minute", self.minute), ("second", self.second)] {
            if let Some(value) = value.filter(|v| !(0..=59).contains(v)) {
                return Err(format!("{name} {value} is outside 0-59"));
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Serialise as `YYYY[-MM[-DD]][THH[:MM[:SS]]]`.
    ///
    /// A component is only written when the one before it is; with
    /// `force_valid_date` missing trailing components are filled first.
    pub fn to_iso(&self, force_valid_date: bool) -> String {
        let parts = self.prepare(force_valid_date);
        let mut out = String::new();

        if let Some(year) = parts.year {
            out.push_str(&date_pad(year, 4));
            if let Some(month) = parts.month {
                out.push('-');
                out.push_str(&date_pad(month, 2));
                if let Some(day) = parts.day {
                    out.push('-');
                    out.push_str(&date_pad(day, 2));
                }
            }
        }

        if let Some(hour) = parts.hour {
            if !out.is_empty() {
                out.push('T');
            }
            out.push_str(&date_pad(hour, 2));
            if let Some(minute) = parts.minute {
                out.push(':');
                out.push_str(&date_pad(minute, 2));
                if let Some(second) = parts.second {
                    out.push(':');
                    out.push_str(&date_pad(second, 2));
                }
            }
        }
        out
    }
}

/// Zero-pad `value` to `size` digits.
pub fn date_pad(value: i64, size: usize) -> String {
    format!("{value:0size$}")
}

/// Free-function form of [`DateParts::prepare`].
pub fn prepare_array(parts: &DateParts, force_valid_date: bool) -> DateParts {
    parts.prepare(force_valid_date)
}

/// Free-function form of [`DateParts::is_valid`].
pub fn check_array(parts: &DateParts) -> bool {
    parts.is_valid()
}

/// Free-function form of [`DateParts::to_iso`].
pub fn array_to_iso(parts: &DateParts, force_valid_date: bool) -> String {
    parts.to_iso(force_valid_date)
}
