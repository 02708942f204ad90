//! Calendar intervals for `add` / `sub`.
//!
//! An [`Interval`] keeps calendar units (years, months, days) apart from
//! clock units (hours, minutes, seconds). Calendar units move the wall clock
//! of the value's own zone, so adding `P1D` across a DST change keeps the
//! time of day. Clock units are elapsed time.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Months, NaiveDateTime, TimeDelta};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::{error::DateError, timezone};

/// A signed span of calendar and clock units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Interval {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Interval {
    pub const fn days(days: i64) -> Self {
        Self {
            years: 0,
            months: 0,
            days,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    pub const fn weeks(weeks: i64) -> Self {
        Self::days(weeks * 7)
    }

    pub const fn months(months: i64) -> Self {
        Self {
            years: 0,
            months,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    pub const fn years(years: i64) -> Self {
        Self {
            years,
            months: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    pub const fn seconds(seconds: i64) -> Self {
        Self {
            years: 0,
            months: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds,
        }
    }

    pub const fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0
    }

    /// The same interval pointing the other way.
    pub const fn negated(&self) -> Self {
        Self {
            years: -self.years,
            months: -self.months,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
        }
    }

    /// Move `instant` by this interval; `None` when the result leaves the
    /// representable range.
    pub(crate) fn apply(&self, instant: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = instant.timezone();
        let local = instant.naive_local();

        let months = self.years.checked_mul(12)?.checked_add(self.months)?;
        let shifted = shift_days(shift_months(local, months)?, self.days)?;

        // Calendar moves that land in a DST gap keep the elapsed distance.
        let moved = match timezone::localize(&tz, &shifted) {
            Some(dt) => dt,
            None => instant.checked_add_signed(shifted.signed_duration_since(local))?,
        };

        let clock = TimeDelta::try_hours(self.hours)?
            .checked_add(&TimeDelta::try_minutes(self.minutes)?)?
            .checked_add(&TimeDelta::try_seconds(self.seconds)?)?;
        moved.checked_add_signed(clock)
    }
}

fn shift_months(local: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let amount = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        local.checked_add_months(amount)
    } else {
        local.checked_sub_months(amount)
    }
}

fn shift_days(local: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    let amount = Days::new(days.unsigned_abs());
    if days >= 0 {
        local.checked_add_days(amount)
    } else {
        local.checked_sub_days(amount)
    }
}

impl fmt::Display for Interval {
    /// ISO 8601 duration, e.g. `P1Y2M3DT4H5M6S`; zero renders as `PT0S`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        f.write_str("P")?;
        for (value, unit) in [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')] {
            if value != 0 {
                write!(f, "{value}{unit}")?;
            }
        }
        if self.hours != 0 || self.minutes != 0 || self.seconds != 0 {
            f.write_str("T")?;
            for (value, unit) in [(self.hours, 'H'), (self.minutes, 'M'), (self.seconds, 'S')] {
                if value != 0 {
                    write!(f, "{value}{unit}")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Interval {
    type Err = DateError;

    /// Parse an ISO 8601 duration such as `P1D`, `P2W`, `PT1H30M` or
    /// `P1Y2M3DT4H5M6S`. Weeks may be combined with days.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DateError::InvalidInterval {
            spec: s.to_owned(),
            reason: reason.to_owned(),
        };

        let body = s
            .trim()
            .strip_prefix(['P', 'p'])
            .ok_or_else(|| invalid("must start with 'P'"))?;
        if body.is_empty() {
            return Err(invalid("no units given"));
        }

        let mut interval = Self::default();
        let mut in_time = false;
        let mut number = String::new();
        let mut saw_unit = false;

        for c in body.chars() {
            match c.to_ascii_uppercase() {
                'T' if !in_time && number.is_empty() => in_time = true,
                d if d.is_ascii_digit() => number.push(d),
                unit => {
                    let value: i64 = number
                        .parse()
                        .map_err(|_| invalid(&format!("unit '{unit}' has no number")))?;
                    number.clear();
                    let slot = match (in_time, unit) {
                        (false, 'Y') => &mut interval.years,
                        (false, 'M') => &mut interval.months,
                        (false, 'W') => {
                            interval.days = interval
                                .days
                                .checked_add(value.checked_mul(7).ok_or_else(|| invalid("too large"))?)
                                .ok_or_else(|| invalid("too large"))?;
                            saw_unit = true;
                            continue;
                        }
                        (false, 'D') => &mut interval.days,
                        (true, 'H') => &mut interval.hours,
                        (true, 'M') => &mut interval.minutes,
                        (true, 'S') => &mut interval.seconds,
                        _ => return Err(invalid(&format!("unexpected '{c}'"))),
                    };
                    *slot = slot.checked_add(value).ok_or_else(|| invalid("too large"))?;
                    saw_unit = true;
                }
            }
        }

        if !number.is_empty() {
            return Err(invalid("trailing number without a unit"));
        }
        if !saw_unit {
            return Err(invalid("no units given"));
        }
        Ok(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn paris(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        Tz::Europe__Paris
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .unwrap()
    }

    #[test]
    fn parses_common_durations() {
        assert_eq!("P1D".parse::<Interval>().unwrap(), Interval::days(1));
        assert_eq!("P2W".parse::<Interval>().unwrap(), Interval::days(14));
        let mixed: Interval = "P1Y2M3DT4H5M6S".parse().unwrap();
        assert_eq!(
            mixed,
            Interval {
                years: 1,
                months: 2,
                days: 3,
                hours: 4,
                minutes: 5,
                seconds: 6
            }
        );
    }

    #[test]
    fn minutes_and_months_are_told_apart() {
        let i: Interval = "P1MT1M".parse().unwrap();
        assert_eq!(i.months, 1);
        assert_eq!(i.minutes, 1);
    }

    #[test]
    fn rejects_malformed_durations() {
        for spec in ["", "1D", "P", "PT", "P1", "PD", "P1X", "PT1D"] {
            assert!(spec.parse::<Interval>().is_err(), "{spec} should be rejected");
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        let i: Interval = "P1Y2M3DT4H5M6S".parse().unwrap();
        assert_eq!(i.to_string(), "P1Y2M3DT4H5M6S");
        assert_eq!(Interval::default().to_string(), "PT0S");
    }

    #[test]
    fn day_step_keeps_wall_clock_across_dst() {
        let before = paris(2021, 3, 27, 12, 0);
        let after = Interval::days(1).apply(&before).unwrap();
        assert_eq!(after, paris(2021, 3, 28, 12, 0));
    }

    #[test]
    fn month_step_clamps_to_month_end() {
        let jan31 = paris(2021, 1, 31, 9, 0);
        let feb = Interval::months(1).apply(&jan31).unwrap();
        assert_eq!(feb, paris(2021, 2, 28, 9, 0));
    }

    #[test]
    fn negated_interval_walks_back() {
        let start = paris(2021, 6, 15, 9, 0);
        let back = Interval::weeks(1).negated().apply(&start).unwrap();
        assert_eq!(back, paris(2021, 6, 8, 9, 0));
    }
}
