//! Permissive free-text date parser.
//!
//! [`parse`] never fails. It reads as much as it can and reports what went
//! wrong through [`Diagnostics`]:
//!
//! - an **error** means part of the text could not be understood at all;
//! - a **warning** means the text was understood but names a value that only
//!   exists after correction (month 0, February 30, `24:00`, a weekday that
//!   does not match the date). A lenient library would silently roll such
//!   values over; callers here treat warnings as fatal.
//!
//! Recognised input, case-insensitive, commas ignored:
//!
//! | Form                         | Example                          |
//! |------------------------------|----------------------------------|
//! | keywords                     | `now`, `today`, `tomorrow noon`  |
//! | Unix timestamp               | `@1592231400`                    |
//! | ISO date / date-time         | `2020-06-15`, `2020-06-15T14:30Z`|
//! | year and month               | `2020-06`                        |
//! | US date                      | `6/15/2020`, `6/15`              |
//! | dotted date                  | `15.06.2020`                     |
//! | textual date                 | `15 Jun 2020`, `June 15th, 2020` |
//! | time of day                  | `14:30`, `2:30:15.25 pm`         |
//! | relative offsets             | `+1 day`, `3 weeks ago`, `next month` |
//! | weekday (alone: next one)    | `monday`, `Sun, 06 Nov 1994`     |
//! | zone                         | `Z`, `UTC`, `+02:00`, `-0500`, `Europe/Paris` |

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::domain::{
    calendar::{days_in_month, month_from_name, weekday_from_name, ymd},
    interval::Interval,
    timezone::{localize, parse_zone_name},
};

const INVALID_DATE: &str = "The parsed date was invalid";
const INVALID_TIME: &str = "The parsed time was invalid";

/// Problems found while reading free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Diagnostics {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DatePart {
    year: Option<i64>,
    month: i64,
    day: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimePart {
    hour: i64,
    minute: i64,
    second: i64,
    nanos: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ZonePart {
    Fixed(i32),
    Named(Tz),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Fortnight,
    Month,
    Year,
}

impl Unit {
    fn from_name(name: &str) -> Option<Self> {
        let unit = match name.to_ascii_lowercase().as_str() {
            "sec" | "secs" | "second" | "seconds" => Self::Second,
            "min" | "mins" | "minute" | "minutes" => Self::Minute,
            "hour" | "hours" => Self::Hour,
            "day" | "days" => Self::Day,
            "week" | "weeks" => Self::Week,
            "fortnight" | "fortnights" => Self::Fortnight,
            "month" | "months" => Self::Month,
            "year" | "years" => Self::Year,
            _ => return None,
        };
        Some(unit)
    }
}

/// Everything [`parse`] understood, plus its diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTime {
    date: Option<DatePart>,
    time: Option<TimePart>,
    timestamp: Option<i64>,
    zone: Option<ZonePart>,
    weekday: Option<Weekday>,
    day_offset: i64,
    reset_time: bool,
    relative: Interval,
    diagnostics: Diagnostics,
}

/// Read `input` leniently. Never fails; inspect [`ParsedTime::diagnostics`].
pub fn parse(input: &str) -> ParsedTime {
    let mut parsed = ParsedTime::default();
    let text = input.trim();

    if let Some(digits) = text.strip_prefix('@') {
        match digits.trim().parse::<i64>() {
            Ok(ts) => parsed.timestamp = Some(ts),
            Err(_) => parsed.error(format!("Unexpected timestamp '{}'", digits.trim())),
        }
        return parsed;
    }

    let normalized = text.replace(',', " ");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    let mut cursor = Cursor {
        tokens: &tokens,
        pos: 0,
    };
    while let Some(token) = cursor.next() {
        parsed.consume(token, &mut cursor);
    }
    parsed.check_weekday();
    parsed
}

struct Cursor<'a> {
    tokens: &'a [&'a str],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn next(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    /// Take the next token when `pred` accepts it.
    fn take_if<T>(&mut self, pred: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        let value = self.peek().and_then(pred)?;
        self.pos += 1;
        Some(value)
    }
}

impl ParsedTime {
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.diagnostics.warnings.push(message.into());
    }

    fn consume(&mut self, token: &str, cursor: &mut Cursor<'_>) {
        let lower = token.to_ascii_lowercase();

        if self.keyword(&lower) {
            return;
        }
        if let Some(weekday) = weekday_from_name(&lower) {
            if self.weekday.replace(weekday).is_some() {
                self.error("Double weekday specification");
            }
            return;
        }
        if let Some(month) = month_from_name(&lower) {
            self.month_first(month, cursor);
            return;
        }
        if matches!(lower.as_str(), "next" | "last" | "previous") {
            let sign = if lower == "next" { 1 } else { -1 };
            match cursor.take_if(Unit::from_name) {
                Some(unit) => self.add_relative(sign, unit),
                None => self.error(format!("Unexpected text '{token}'")),
            }
            return;
        }
        if starts_with_iso_date(token) {
            self.iso(token, cursor);
            return;
        }
        if starts_with_digit(token) && token.contains(':') {
            self.time_token(token, cursor);
            return;
        }
        if starts_with_digit(token) && token.contains('/') {
            self.slashed(token);
            return;
        }
        if starts_with_digit(token) && token.contains('.') {
            self.dotted(token);
            return;
        }
        if let Some(amount) = signed_number(token) {
            if let Some(unit) = cursor.take_if(Unit::from_name) {
                let ago = cursor.take_if(|t| t.eq_ignore_ascii_case("ago").then_some(()));
                self.add_relative(if ago.is_some() { -amount } else { amount }, unit);
                return;
            }
        }
        if let Some(day) = day_number(token) {
            if let Some(month) = cursor.take_if(month_from_name) {
                let year = cursor.take_if(year_number);
                self.set_date(year, month, day);
                return;
            }
        }
        if token.starts_with(['+', '-']) {
            match parse_offset(token) {
                Some(seconds) => self.set_zone(ZonePart::Fixed(seconds)),
                None => self.error(format!("Unexpected text '{token}'")),
            }
            return;
        }
        match parse_zone_name(token) {
            Some(tz) => self.set_zone(ZonePart::Named(tz)),
            None => self.error(format!("Unexpected text '{token}'")),
        }
    }

    fn keyword(&mut self, lower: &str) -> bool {
        match lower {
            "now" => {}
            "today" | "midnight" => self.reset_time = true,
            "noon" => {
                self.reset_time = true;
                self.set_time(TimePart {
                    hour: 12,
                    minute: 0,
                    second: 0,
                    nanos: 0,
                });
            }
            "tomorrow" => {
                self.day_offset += 1;
                self.reset_time = true;
            }
            "yesterday" => {
                self.day_offset -= 1;
                self.reset_time = true;
            }
            _ => return false,
        }
        true
    }

    /// `June 15th 2020`, `Jun 2020`, `June`.
    fn month_first(&mut self, month: i64, cursor: &mut Cursor<'_>) {
        if let Some(day) = cursor.take_if(day_number) {
            let year = cursor.take_if(year_number);
            self.set_date(year, month, day);
        } else if let Some(year) = cursor.take_if(year_number) {
            self.set_date(Some(year), month, 1);
        } else {
            self.set_date(None, month, 1);
        }
    }

    /// `2020-06-15`, `2020-06`, optionally followed by `T<time>`.
    fn iso(&mut self, token: &str, cursor: &mut Cursor<'_>) {
        let (date_text, time_text) = match token.find(['T', 't']) {
            Some(at) => (&token[..at], Some(&token[at + 1..])),
            None => (token, None),
        };

        let mut pieces = date_text.split('-');
        let year = pieces.next().and_then(|p| small_number(p, 4));
        let month = pieces.next().and_then(|p| small_number(p, 2));
        let day = pieces.next().map(|p| small_number(p, 2));
        match (year, month, day, pieces.next()) {
            (Some(y), Some(m), None, None) => self.set_date(Some(y), m, 1),
            (Some(y), Some(m), Some(Some(d)), None) => self.set_date(Some(y), m, d),
            _ => {
                self.error(format!("Unexpected text '{token}'"));
                return;
            }
        }

        match time_text {
            Some("") => self.error(format!("Unexpected text '{token}'")),
            Some(time) => self.time_token(time, cursor),
            None => {}
        }
    }

    /// `m/d/Y`, `m/d/y`, `m/d`.
    fn slashed(&mut self, token: &str) {
        let pieces: Vec<&str> = token.split('/').collect();
        match pieces.as_slice() {
            [m, d] => match (small_number(m, 2), small_number(d, 2)) {
                (Some(m), Some(d)) => self.set_date(None, m, d),
                _ => self.error(format!("Unexpected text '{token}'")),
            },
            [m, d, y] => match (small_number(m, 2), small_number(d, 2), year_digits(y)) {
                (Some(m), Some(d), Some(y)) => self.set_date(Some(y), m, d),
                _ => self.error(format!("Unexpected text '{token}'")),
            },
            _ => self.error(format!("Unexpected text '{token}'")),
        }
    }

    /// `d.m.Y`.
    fn dotted(&mut self, token: &str) {
        let pieces: Vec<&str> = token.split('.').collect();
        match pieces.as_slice() {
            [d, m, y] if y.len() == 4 => match (small_number(d, 2), small_number(m, 2), small_number(y, 4)) {
                (Some(d), Some(m), Some(y)) => self.set_date(Some(y), m, d),
                _ => self.error(format!("Unexpected text '{token}'")),
            },
            _ => self.error(format!("Unexpected text '{token}'")),
        }
    }

    /// `H:MM[:SS[.frac]]` with an optional meridiem and zone, attached or
    /// as the following token.
    fn time_token(&mut self, token: &str, cursor: &mut Cursor<'_>) {
        let Some((mut time, rest)) = split_time(token) else {
            self.error(format!("Unexpected text '{token}'"));
            return;
        };

        let (meridiem, zone_text) = match meridiem(rest) {
            Some(pm) => (Some(pm), ""),
            None if rest.is_empty() => (cursor.take_if(meridiem), ""),
            None => (None, rest),
        };

        if let Some(pm) = meridiem {
            if !(1..=12).contains(&time.hour) {
                self.error(format!("Unexpected hour {} for a 12-hour clock", time.hour));
                return;
            }
            time.hour = match (pm, time.hour) {
                (false, 12) => 0,
                (true, 12) => 12,
                (true, h) => h + 12,
                (false, h) => h,
            };
        }
        self.set_time(time);

        if !zone_text.is_empty() {
            let zone = if zone_text.starts_with(['+', '-']) {
                parse_offset(zone_text).map(ZonePart::Fixed)
            } else {
                parse_zone_name(zone_text).map(ZonePart::Named)
            };
            match zone {
                Some(zone) => self.set_zone(zone),
                None => self.error(format!("Unexpected text '{zone_text}'")),
            }
        }
    }

    fn set_date(&mut self, year: Option<i64>, month: i64, day: i64) {
        if self.date.is_some() {
            self.error("Double date specification");
            return;
        }
        if month > 12 || day > 31 {
            self.error(format!("Unexpected date {month}/{day}"));
            return;
        }
        // Without a year February 29th is given the benefit of the doubt.
        let limit = match year {
            Some(year) => days_in_month(year, month),
            None if month == 2 => 29,
            None => days_in_month(2000, month),
        };
        if month == 0 || day == 0 || day > limit {
            self.warning(INVALID_DATE);
        }
        self.date = Some(DatePart { year, month, day });
    }

    fn set_time(&mut self, time: TimePart) {
        if self.time.is_some() {
            self.error("Double time specification");
            return;
        }
        if time.hour > 24 || time.minute > 59 || time.second > 60 {
            self.error(format!(
                "Unexpected time {}:{:02}:{:02}",
                time.hour, time.minute, time.second
            ));
            return;
        }
        if time.hour == 24 || time.second == 60 {
            self.warning(INVALID_TIME);
        }
        self.time = Some(time);
    }

    fn set_zone(&mut self, zone: ZonePart) {
        if self.zone.replace(zone).is_some() {
            self.error("Double timezone specification");
        }
    }

    fn add_relative(&mut self, amount: i64, unit: Unit) {
        let (slot, factor) = match unit {
            Unit::Second => (&mut self.relative.seconds, 1),
            Unit::Minute => (&mut self.relative.minutes, 1),
            Unit::Hour => (&mut self.relative.hours, 1),
            Unit::Day => (&mut self.relative.days, 1),
            Unit::Week => (&mut self.relative.days, 7),
            Unit::Fortnight => (&mut self.relative.days, 14),
            Unit::Month => (&mut self.relative.months, 1),
            Unit::Year => (&mut self.relative.years, 1),
        };
        match amount.checked_mul(factor).and_then(|v| slot.checked_add(v)) {
            Some(total) => *slot = total,
            None => self.error("Relative offset is too large"),
        }
    }

    /// A weekday next to a full date must agree with it.
    fn check_weekday(&mut self) {
        let (Some(weekday), Some(date)) = (self.weekday, self.date) else {
            return;
        };
        let Some(year) = date.year else {
            return;
        };
        if self.diagnostics.has_warnings() || self.diagnostics.has_errors() {
            return;
        }
        if ymd(year, date.month, date.day).is_some_and(|d| d.weekday() != weekday) {
            self.warning(INVALID_DATE);
        }
    }

    /// Turn what was read into an instant.
    ///
    /// `tz` is the zone of the value being built; a zone name inside the text
    /// takes over, a numeric offset is converted into `tz`. Fields absent
    /// from the text are taken from `now`.
    pub(crate) fn resolve(&self, tz: Tz, now: DateTime<Utc>) -> Result<DateTime<Tz>, String> {
        let base = match self.timestamp {
            Some(ts) => DateTime::from_timestamp(ts, 0)
                .ok_or_else(|| format!("The timestamp {ts} is outside the supported range"))?
                .with_timezone(&tz),
            None => self.resolve_wall_clock(tz, now)?,
        };

        if self.relative.is_zero() {
            return Ok(base);
        }
        self.relative
            .apply(&base)
            .ok_or_else(|| "The date is outside the supported range".to_owned())
    }

    fn resolve_wall_clock(&self, tz: Tz, now: DateTime<Utc>) -> Result<DateTime<Tz>, String> {
        let zone = match self.zone {
            Some(ZonePart::Named(named)) => named,
            _ => tz,
        };
        let local_now = now.with_timezone(&zone).naive_local();
        let out_of_range = || "The date is outside the supported range".to_owned();

        let date = match (self.date, self.weekday) {
            (Some(d), _) => {
                let year = d.year.unwrap_or_else(|| i64::from(local_now.year()));
                ymd(year, d.month, d.day).ok_or_else(|| INVALID_DATE.to_owned())?
            }
            (None, Some(weekday)) => next_weekday(local_now.date(), weekday).ok_or_else(out_of_range)?,
            (None, None) => local_now.date(),
        };
        let date = shift_days(date, self.day_offset).ok_or_else(out_of_range)?;

        let time = match self.time {
            Some(t) => NaiveTime::from_hms_nano_opt(
                u32::try_from(t.hour).map_err(|_| INVALID_TIME.to_owned())?,
                u32::try_from(t.minute).map_err(|_| INVALID_TIME.to_owned())?,
                u32::try_from(t.second).map_err(|_| INVALID_TIME.to_owned())?,
                t.nanos,
            )
            .ok_or_else(|| INVALID_TIME.to_owned())?,
            None if self.date.is_some() || self.weekday.is_some() || self.reset_time => {
                NaiveTime::default()
            }
            None => local_now.time(),
        };
        let naive = date.and_time(time);

        match self.zone {
            Some(ZonePart::Fixed(seconds)) => FixedOffset::east_opt(seconds)
                .and_then(|offset| offset.from_local_datetime(&naive).single())
                .map(|dt| dt.with_timezone(&tz))
                .ok_or_else(|| format!("Unexpected offset of {seconds} seconds")),
            _ => localize(&zone, &naive).ok_or_else(|| {
                format!(
                    "The local time {naive} does not exist in timezone {}",
                    zone.name()
                )
            }),
        }
    }
}

fn next_weekday(from: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let ahead = (7 + weekday.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;
    from.checked_add_days(Days::new(u64::from(ahead)))
}

fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

fn starts_with_digit(token: &str) -> bool {
    token.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

fn starts_with_iso_date(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() > 5 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}

/// 1 to `max_len` ASCII digits.
fn small_number(text: &str, max_len: usize) -> Option<i64> {
    if text.is_empty() || text.len() > max_len || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn signed_number(token: &str) -> Option<i64> {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    if digits.is_empty() || digits.len() > 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// A day of month, optionally with an English ordinal suffix.
fn day_number(token: &str) -> Option<i64> {
    let lower = token.to_ascii_lowercase();
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))
        .unwrap_or(&lower);
    small_number(digits, 2)
}

fn year_number(token: &str) -> Option<i64> {
    (token.len() == 4).then(|| small_number(token, 4)).flatten()
}

/// Four-digit years as written; two-digit years map to 1970-2069.
fn year_digits(token: &str) -> Option<i64> {
    match token.len() {
        4 => small_number(token, 4),
        2 => small_number(token, 2).map(|y| if y < 70 { 2000 + y } else { 1900 + y }),
        _ => None,
    }
}

fn meridiem(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "am" | "a.m." => Some(false),
        "pm" | "p.m." => Some(true),
        _ => None,
    }
}

/// `±HH`, `±HHMM` or `±HH:MM` to seconds east of UTC.
fn parse_offset(text: &str) -> Option<i32> {
    let (sign, body) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    // Only ASCII from here on, so byte offsets are char boundaries.
    let digits_or_colon = body
        .bytes()
        .enumerate()
        .all(|(i, b)| b.is_ascii_digit() || (i == 2 && b == b':'));
    if !digits_or_colon {
        return None;
    }
    let (hours, minutes) = match body.len() {
        1 | 2 => (body, "0"),
        4 => body.split_at(2),
        5 if body.as_bytes()[2] == b':' => (&body[..2], &body[3..]),
        _ => return None,
    };
    let hours = small_number(hours, 2)?;
    let minutes = small_number(minutes, 2)?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    i32::try_from(sign * (hours * 3600 + minutes * 60)).ok()
}

/// Split `H:MM[:SS[.frac]]<rest>`.
fn split_time(token: &str) -> Option<(TimePart, &str)> {
    let bytes = token.as_bytes();
    let mut pos = 0;

    let read_digits = |pos: &mut usize, min: usize, max: usize| -> Option<i64> {
        let start = *pos;
        while *pos < bytes.len() && *pos - start < max && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
        if *pos - start < min {
            return None;
        }
        token[start..*pos].parse().ok()
    };

    let hour = read_digits(&mut pos, 1, 2)?;
    if bytes.get(pos) != Some(&b':') {
        return None;
    }
    pos += 1;
    let minute = read_digits(&mut pos, 2, 2)?;

    let mut second = 0;
    let mut nanos = 0;
    if bytes.get(pos) == Some(&b':') {
        pos += 1;
        second = read_digits(&mut pos, 2, 2)?;
        if bytes.get(pos) == Some(&b'.') {
            pos += 1;
            let start = pos;
            let fraction = read_digits(&mut pos, 1, 9)?;
            let width = u32::try_from(pos - start).ok()?;
            nanos = u32::try_from(fraction).ok()? * 10u32.pow(9 - width);
        }
    }

    Some((
        TimePart {
            hour,
            minute,
            second,
            nanos,
        },
        &token[pos..],
    ))
}
