//! The lenient date-time value object.
//!
//! A [`DateValue`] is built from text, parts, a timestamp or an existing
//! instant. Free-text construction never fails: problems are collected in an
//! error list and the value stays around so a form can show what went wrong.
//! Constructors fed by code (timestamps, formats, part arrays) return
//! [`DateError`] instead.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

use crate::domain::{
    error::DateError,
    interval::Interval,
    lenient::{self, Diagnostics},
    parts::{self, DateParts},
    pattern,
    settings::Settings,
    timezone::{TimeZoneInput, localize},
};

const INVALID_DATE: &str = "The date is invalid.";
const OUT_OF_RANGE: &str = "The date is outside the supported range";

#[derive(Debug, Clone, PartialEq)]
pub struct DateValue {
    instant: Option<DateTime<Tz>>,
    timezone: Tz,
    errors: Vec<String>,
    langcode: Option<String>,
}

impl DateValue {
    /// Canonical pattern used for display and re-validation.
    pub const FORMAT: &'static str = "Y-m-d H:i:s";

    /// HTTP date pattern.
    pub const RFC7231: &'static str = "D, d M Y H:i:s \\G\\M\\T";

    fn empty(timezone: Tz, settings: &Settings) -> Self {
        Self {
            instant: None,
            timezone,
            errors: Vec::new(),
            langcode: settings.langcode.clone(),
        }
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// Build from free text. An empty string means now.
    ///
    /// Never fails; check [`has_errors`](Self::has_errors). Text that only
    /// makes sense after correction (February 30th, hour 24) is rejected with
    /// `"The date is invalid."` rather than silently rolled over.
    pub fn from_time(
        time: &str,
        timezone: impl Into<TimeZoneInput>,
        settings: &Settings,
    ) -> Self {
        let (tz, tz_error) = timezone.into().resolve();
        let mut value = Self::empty(tz, settings);
        value.errors.extend(tz_error);

        let parsed = lenient::parse(time);
        let diagnostics = parsed.diagnostics();
        value.errors.extend(diagnostics.errors.iter().cloned());

        if value.errors.is_empty() && !diagnostics.has_warnings() {
            match parsed.resolve(tz, Utc::now()) {
                Ok(instant) => {
                    value.timezone = instant.timezone();
                    value.instant = Some(instant);
                }
                Err(message) => value.errors.push(message),
            }
        }

        value.check_errors(diagnostics);
        value.dedup_errors();
        value
    }

    /// Re-validate an existing instant.
    ///
    /// Without an override the instant keeps its own zone. With one, the
    /// wall-clock reading is kept and reinterpreted in the new zone.
    pub fn from_instant(
        instant: &DateTime<Tz>,
        timezone: impl Into<TimeZoneInput>,
        settings: &Settings,
    ) -> Self {
        let timezone = match timezone.into() {
            TimeZoneInput::Default => TimeZoneInput::Zone(instant.timezone()),
            other => other,
        };
        let text = instant.format("%Y-%m-%d %H:%M:%S").to_string();
        Self::from_time(&text, timezone, settings)
    }

    /// Build from separate parts. Missing parts default to the current year,
    /// January, the 1st and midnight.
    pub fn from_parts(
        parts: &DateParts,
        timezone: impl Into<TimeZoneInput>,
        settings: &Settings,
    ) -> Result<Self, DateError> {
        let prepared = parts.prepare(true);
        prepared
            .validate()
            .map_err(|reason| DateError::InvalidParts { reason })?;
        Ok(Self::from_time(&prepared.to_iso(true), timezone, settings))
    }

    /// Build from seconds since the Unix epoch.
    pub fn from_timestamp(
        timestamp: i64,
        timezone: impl Into<TimeZoneInput>,
        settings: &Settings,
    ) -> Result<Self, DateError> {
        let mut value = Self::from_time("", timezone, settings);
        value.set_timestamp(timestamp)?;
        Ok(value)
    }

    /// Like [`from_timestamp`](Self::from_timestamp) for textual input.
    ///
    /// Integers and finite decimals are accepted; decimals are truncated.
    pub fn from_timestamp_str(
        timestamp: &str,
        timezone: impl Into<TimeZoneInput>,
        settings: &Settings,
    ) -> Result<Self, DateError> {
        let text = timestamp.trim();
        let not_numeric = || DateError::NotNumeric {
            input: timestamp.to_owned(),
        };
        let seconds = match text.parse::<i64>() {
            Ok(seconds) => seconds,
            Err(_) => {
                let float = text.parse::<f64>().map_err(|_| not_numeric())?;
                if !float.is_finite() {
                    return Err(not_numeric());
                }
                let truncated = float.trunc();
                if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
                    return Err(DateError::TimestampOutOfRange {
                        timestamp: if truncated < 0.0 { i64::MIN } else { i64::MAX },
                    });
                }
                truncated as i64
            }
        };
        Self::from_timestamp(seconds, timezone, settings)
    }

    /// Build from `time` read with a letter-pattern `format`.
    ///
    /// With `validate_format` the parsed value must render back to exactly
    /// `time`, which catches inputs the reader silently normalised (a `Y`
    /// given `11` reads as the year 0011).
    pub fn from_format(
        format: &str,
        time: &str,
        timezone: impl Into<TimeZoneInput>,
        settings: &Settings,
    ) -> Result<Self, DateError> {
        let unparsable = |err: pattern::PatternError| DateError::FormatUnparsable {
            format: format.to_owned(),
            reason: err.to_string(),
        };

        let mut value = Self::from_time("", timezone, settings);
        let reading = pattern::read(format, time, value.timezone, Utc::now()).map_err(unparsable)?;
        let rendered = reading
            .render(&pattern::strip_parse_modifiers(format))
            .map_err(unparsable)?;

        value.timezone = reading.instant.timezone();
        value.instant = Some(reading.instant);

        if settings.validate_format && rendered != time {
            return Err(DateError::FormatMismatch {
                input: time.to_owned(),
                rendered,
            });
        }
        Ok(value)
    }

    /// The `occurrence`-th `weekday` of a month, at midnight in the default
    /// zone. Month and year default to the current ones.
    ///
    /// An occurrence past the end of the month clamps to the last one.
    pub fn from_day_of_month(
        occurrence: u32,
        weekday: Weekday,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Self, DateError> {
        Self::from_day_of_month_in(
            occurrence,
            weekday,
            month,
            year,
            TimeZoneInput::Default,
            &Settings::default(),
        )
    }

    /// [`from_day_of_month`](Self::from_day_of_month) in a chosen zone.
    pub fn from_day_of_month_in(
        occurrence: u32,
        weekday: Weekday,
        month: Option<u32>,
        year: Option<i32>,
        timezone: impl Into<TimeZoneInput>,
        settings: &Settings,
    ) -> Result<Self, DateError> {
        if occurrence == 0 {
            return Err(DateError::InvalidOccurrence { occurrence });
        }
        let timezone = timezone.into();
        let today = Utc::now().with_timezone(&timezone.resolve().0);
        let month = month.unwrap_or_else(|| today.month());
        let year = year.unwrap_or_else(|| today.year());
        if !(1..=12).contains(&month) {
            return Err(DateError::InvalidMonth { month });
        }

        let mut value = Self::from_format(
            "!Y-m-d",
            &format!("{year:04}-{month:02}-01"),
            timezone,
            settings,
        )?;
        let first = value
            .instant
            .map(|instant| instant.date_naive())
            .ok_or_else(|| DateError::Unresolved {
                errors: value.errors.clone(),
            })?;

        let target = nth_weekday(first, weekday, occurrence).ok_or(DateError::Unresolved {
            errors: vec![OUT_OF_RANGE.to_owned()],
        })?;
        let offset = target.signed_duration_since(first).num_days();
        value.add(&Interval::days(offset));
        Ok(value)
    }

    // ========================================================================
    // Formatting
    // ========================================================================

    /// Render with a letter pattern; `None` once the value has errors.
    ///
    /// A pattern that cannot be rendered is recorded as an error.
    pub fn format(&mut self, pattern: &str) -> Option<String> {
        if self.has_errors() {
            return None;
        }
        let instant = self.instant?;
        match pattern::render(&instant, pattern) {
            Ok(text) => Some(text),
            Err(err) => {
                self.push_error(err.to_string());
                None
            }
        }
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    /// Move to 00:00:00 of the same day.
    pub fn midnight(&mut self) -> &mut Self {
        self.set_time_of_day(NaiveTime::default())
    }

    pub fn beginning_of_day(&mut self) -> &mut Self {
        self.midnight()
    }

    /// Move to 23:59:59 of the same day.
    pub fn end_of_day(&mut self) -> &mut Self {
        match NaiveTime::from_hms_opt(23, 59, 59) {
            Some(time) => self.set_time_of_day(time),
            None => self,
        }
    }

    fn set_time_of_day(&mut self, time: NaiveTime) -> &mut Self {
        let Some(instant) = self.instant else {
            return self;
        };
        let naive = instant.date_naive().and_time(time);
        match localize(&self.timezone, &naive) {
            Some(moved) => self.instant = Some(moved),
            None => self.push_error(format!(
                "The local time {naive} does not exist in timezone {}",
                self.timezone.name()
            )),
        }
        self
    }

    pub fn add(&mut self, interval: &Interval) -> &mut Self {
        if let Some(instant) = self.instant {
            match interval.apply(&instant) {
                Some(moved) => self.instant = Some(moved),
                None => self.push_error(OUT_OF_RANGE),
            }
        }
        self
    }

    pub fn sub(&mut self, interval: &Interval) -> &mut Self {
        self.add(&interval.negated())
    }

    /// Express the same instant in another zone.
    pub fn set_timezone(&mut self, timezone: Tz) -> &mut Self {
        self.timezone = timezone;
        self.instant = self.instant.map(|instant| instant.with_timezone(&timezone));
        self
    }

    /// Replace the instant, keeping the zone.
    pub fn set_timestamp(&mut self, timestamp: i64) -> Result<&mut Self, DateError> {
        let utc = DateTime::from_timestamp(timestamp, 0)
            .ok_or(DateError::TimestampOutOfRange { timestamp })?;
        self.instant = Some(utc.with_timezone(&self.timezone));
        Ok(self)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Which occurrence of its weekday this date is within its month.
    ///
    /// Same answer as stepping a week at a time from the first such weekday
    /// until the date is reached, counting the steps.
    pub fn day_occurrence_of_month(&self) -> Option<u32> {
        let date = self.instant?.date_naive();
        let first = NaiveDate::from_weekday_of_month_opt(date.year(), date.month(), date.weekday(), 1)?;
        Some((date.day() - first.day()) / 7 + 1)
    }

    pub fn instant(&self) -> Option<DateTime<Tz>> {
        self.instant
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.instant.map(|instant| instant.timestamp())
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn langcode(&self) -> Option<&str> {
        self.langcode.as_deref()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    // ========================================================================
    // Part helpers
    // ========================================================================

    pub fn prepare_array(parts: &DateParts, force_valid_date: bool) -> DateParts {
        parts::prepare_array(parts, force_valid_date)
    }

    pub fn check_array(parts: &DateParts) -> bool {
        parts::check_array(parts)
    }

    pub fn array_to_iso(parts: &DateParts, force_valid_date: bool) -> String {
        parts::array_to_iso(parts, force_valid_date)
    }

    pub fn date_pad(value: i64, size: usize) -> String {
        parts::date_pad(value, size)
    }

    // ========================================================================
    // Error bookkeeping
    // ========================================================================

    /// Fold parser diagnostics into the error list. Warnings mean the text
    /// was corrected, which counts as invalid.
    fn check_errors(&mut self, diagnostics: &Diagnostics) {
        self.errors.extend(diagnostics.errors.iter().cloned());
        if diagnostics.has_warnings() {
            self.errors.push(INVALID_DATE.to_owned());
        }
    }

    fn push_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.errors.contains(&message) {
            self.errors.push(message);
        }
    }

    fn dedup_errors(&mut self) {
        let mut seen = HashSet::new();
        self.errors.retain(|error| seen.insert(error.clone()));
    }
}

/// Walk to the first `weekday` of the month starting at `first`, step
/// forward `occurrence - 1` weeks, then back until inside the month again.
fn nth_weekday(first: NaiveDate, weekday: Weekday, occurrence: u32) -> Option<NaiveDate> {
    let mut date = first;
    while date.weekday() != weekday {
        date = date.succ_opt()?;
    }
    // Five weeks past any first occurrence already leaves the month.
    let weeks = occurrence.saturating_sub(1).min(5);
    date = date.checked_add_days(chrono::Days::new(u64::from(weeks) * 7))?;
    while date.month() != first.month() {
        date = date.checked_sub_days(chrono::Days::new(7))?;
    }
    Some(date)
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = match self.instant {
            Some(instant) if !self.has_errors() => {
                pattern::render(&instant, Self::FORMAT).unwrap_or_default()
            }
            _ => String::new(),
        };
        write!(f, "{date} {}", self.timezone.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn settings() -> Settings {
        Settings::default()
    }

    fn at(time: &str, tz: &str) -> DateValue {
        DateValue::from_time(time, tz, &settings())
    }

    #[test]
    fn parses_valid_text() {
        let value = at("2020-06-15 14:30:00", "Europe/Paris");
        assert!(!value.has_errors(), "{:?}", value.errors());
        assert_eq!(value.timezone(), Tz::Europe__Paris);
        assert_eq!(value.instant().unwrap().to_rfc3339(), "2020-06-15T14:30:00+02:00");
    }

    #[test]
    fn rolled_over_text_is_invalid() {
        let mut value = at("2011-02-30", "UTC");
        assert!(value.has_errors());
        assert!(value.errors().iter().any(|e| e == INVALID_DATE));
        assert!(value.instant().is_none());
        assert_eq!(value.format(DateValue::FORMAT), None);
    }

    #[test]
    fn garbage_keeps_parser_errors_once() {
        let value = at("foo foo", "UTC");
        assert_eq!(value.errors(), ["Unexpected text 'foo'"]);
    }

    #[test]
    fn bad_zone_is_soft() {
        let value = at("2020-06-15", "Nowhere/Special");
        assert_eq!(value.errors(), ["Unknown or bad timezone (Nowhere/Special)"]);
    }

    #[test]
    fn zone_in_text_takes_over() {
        let value = at("2020-06-15 14:30 Asia/Tokyo", "UTC");
        assert_eq!(value.timezone(), Tz::Asia__Tokyo);
    }

    #[test]
    fn dst_gap_is_a_soft_error() {
        let value = at("2021-03-28 02:30:00", "Europe/Paris");
        assert!(value.has_errors());
        assert!(value.errors()[0].contains("does not exist"));
    }

    #[test]
    fn empty_text_is_now() {
        let value = at("", "UTC");
        let drift = (Utc::now().timestamp() - value.timestamp().unwrap()).abs();
        assert!(drift <= 5);
    }

    #[test]
    fn from_instant_keeps_or_reinterprets_wall_clock() {
        let tokyo = Tz::Asia__Tokyo.with_ymd_and_hms(2020, 6, 15, 9, 0, 0).single().unwrap();
        let same = DateValue::from_instant(&tokyo, TimeZoneInput::Default, &settings());
        assert_eq!(same.instant(), Some(tokyo));

        let moved = DateValue::from_instant(&tokyo, "Europe/Paris", &settings());
        assert_eq!(moved.instant().unwrap().to_rfc3339(), "2020-06-15T09:00:00+02:00");
    }

    #[test]
    fn from_parts_fills_and_validates() {
        let parts = DateParts::new().year(2020).month(6).day(15).hour(9);
        let value = DateValue::from_parts(&parts, "UTC", &settings()).unwrap();
        assert_eq!(value.instant().unwrap().to_rfc3339(), "2020-06-15T09:00:00+00:00");

        let bad = DateParts::new().year(2011).month(2).day(30);
        let err = DateValue::from_parts(&bad, "UTC", &settings()).unwrap_err();
        assert!(err.to_string().starts_with("The array contains invalid values"));
    }

    #[test]
    fn timestamps() {
        let value = DateValue::from_timestamp(1_592_231_400, "Europe/Paris", &settings()).unwrap();
        assert_eq!(value.instant().unwrap().to_rfc3339(), "2020-06-15T16:30:00+02:00");

        let value = DateValue::from_timestamp_str("1592231400.9", "UTC", &settings()).unwrap();
        assert_eq!(value.timestamp(), Some(1_592_231_400));

        let err = DateValue::from_timestamp_str("abc", "UTC", &settings()).unwrap_err();
        assert!(matches!(err, DateError::NotNumeric { .. }));
        assert!(DateValue::from_timestamp(i64::MAX, "UTC", &settings()).is_err());
    }

    #[test]
    fn from_format_round_trips() {
        let value = DateValue::from_format("Y-m-d H:i:s", "2020-06-15 14:30:00", "UTC", &settings()).unwrap();
        assert_eq!(value.instant().unwrap().to_rfc3339(), "2020-06-15T14:30:00+00:00");
    }

    #[test]
    fn from_format_rejects_normalised_input() {
        let err = DateValue::from_format("Y", "11", "UTC", &settings()).unwrap_err();
        assert_eq!(
            err,
            DateError::FormatMismatch {
                input: "11".into(),
                rendered: "0011".into()
            }
        );
        let relaxed = Settings::default().with_validate_format(false);
        let value = DateValue::from_format("Y", "11", "UTC", &relaxed).unwrap();
        assert_eq!(value.instant().unwrap().year(), 11);
    }

    #[test]
    fn from_format_keeps_fractional_hour_offsets() {
        let value =
            DateValue::from_format("Y-m-d H:i O", "2020-06-15 14:30 +0530", "UTC", &settings()).unwrap();
        assert_eq!(value.instant().unwrap().to_rfc3339(), "2020-06-15T09:00:00+00:00");
        assert!(DateValue::from_format("Y-m-d H:i P", "2020-06-15 14:30 -09:30", "UTC", &settings()).is_ok());
    }

    #[test]
    fn from_format_rejects_unparsable_input() {
        let err = DateValue::from_format("Y-m-d", "June", "UTC", &settings()).unwrap_err();
        assert!(matches!(err, DateError::FormatUnparsable { .. }));
    }

    #[test]
    fn nth_weekday_of_month() {
        // June 2020 started on a Monday.
        let value =
            DateValue::from_day_of_month_in(2, Weekday::Wed, Some(6), Some(2020), "UTC", &settings())
                .unwrap();
        assert_eq!(value.instant().unwrap().to_rfc3339(), "2020-06-10T00:00:00+00:00");
    }

    #[test]
    fn missing_fifth_weekday_clamps_to_last() {
        let value =
            DateValue::from_day_of_month_in(5, Weekday::Fri, Some(6), Some(2020), "UTC", &settings())
                .unwrap();
        assert_eq!(value.instant().unwrap().day(), 26);
        let far =
            DateValue::from_day_of_month_in(40, Weekday::Fri, Some(6), Some(2020), "UTC", &settings())
                .unwrap();
        assert_eq!(far.instant(), value.instant());
    }

    #[test]
    fn nth_weekday_rejects_bad_arguments() {
        assert_eq!(
            DateValue::from_day_of_month(0, Weekday::Mon, Some(1), Some(2020)),
            Err(DateError::InvalidOccurrence { occurrence: 0 })
        );
        assert_eq!(
            DateValue::from_day_of_month(1, Weekday::Mon, Some(13), Some(2020)),
            Err(DateError::InvalidMonth { month: 13 })
        );
    }

    #[test]
    fn occurrence_of_month() {
        let value = at("2020-06-24", "UTC");
        assert_eq!(value.day_occurrence_of_month(), Some(4));
        assert_eq!(at("2020-06-03", "UTC").day_occurrence_of_month(), Some(1));
    }

    #[test]
    fn occurrence_matches_weekly_walk() {
        for day in 1..=31 {
            let text = format!("2021-12-{day:02}");
            let value = at(&text, "UTC");
            let date = value.instant().unwrap().date_naive();
            let mut cursor = NaiveDate::from_weekday_of_month_opt(2021, 12, date.weekday(), 1).unwrap();
            let mut walked = 1;
            while cursor < date {
                cursor = cursor.checked_add_days(chrono::Days::new(7)).unwrap();
                walked += 1;
            }
            assert_eq!(value.day_occurrence_of_month(), Some(walked), "{text}");
        }
    }

    #[test]
    fn day_boundaries() {
        let mut value = at("2020-06-15 14:30:00", "Europe/Paris");
        value.end_of_day();
        assert_eq!(value.format("H:i:s").as_deref(), Some("23:59:59"));
        value.midnight();
        assert_eq!(value.format(DateValue::FORMAT).as_deref(), Some("2020-06-15 00:00:00"));
        assert_eq!(value.instant().unwrap().hour(), 0);
    }

    #[test]
    fn add_and_sub() {
        let mut value = at("2020-01-31 10:00:00", "UTC");
        value.add(&Interval::months(1));
        assert_eq!(value.format("Y-m-d").as_deref(), Some("2020-02-29"));
        value.sub(&"P1W".parse().unwrap());
        assert_eq!(value.format("Y-m-d").as_deref(), Some("2020-02-22"));
    }

    #[test]
    fn set_timezone_converts() {
        let mut value = at("2020-06-15 12:00:00", "UTC");
        value.set_timezone(Tz::Asia__Tokyo);
        assert_eq!(value.format("H:i e").as_deref(), Some("21:00 Asia/Tokyo"));
    }

    #[test]
    fn render_failure_is_recorded() {
        let mut value = at("2020-06-15", "UTC");
        assert_eq!(value.format("Y\\"), None);
        assert!(value.has_errors());
        assert_eq!(value.format("Y"), None);
    }

    #[test]
    fn display_includes_zone_name() {
        let value = at("2020-06-15 14:30:00", "Europe/Paris");
        assert_eq!(value.to_string(), "2020-06-15 14:30:00 Europe/Paris");
        assert_eq!(at("2011-02-30", "UTC").to_string(), " UTC");
    }

    #[test]
    fn langcode_is_carried() {
        let settings = Settings::default().with_langcode("fr");
        assert_eq!(DateValue::from_time("now", "UTC", &settings).langcode(), Some("fr"));
    }

    #[test]
    fn rfc7231_pattern() {
        let mut value = at("1994-11-06 08:49:37", "UTC");
        assert_eq!(
            value.format(DateValue::RFC7231).as_deref(),
            Some("Sun, 06 Nov 1994 08:49:37 GMT")
        );
    }
}
