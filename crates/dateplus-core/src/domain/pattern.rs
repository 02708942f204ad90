//! Single-letter date patterns (`Y-m-d H:i:s`, `D, d M Y`, ...).
//!
//! One character set drives both directions: [`render`] turns an instant
//! into text and [`parse`] reads text back following the same pattern. A
//! backslash makes the next character literal.

use std::fmt;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone,
    Timelike, Utc,
};
use chrono_tz::{OffsetComponents, Tz};
use thiserror::Error;

use crate::domain::{
    calendar::{
        days_in_month, is_leap_year, month_from_name, month_name, weekday_from_name, weekday_name,
        ymd,
    },
    timezone::{localize, parse_zone_name},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("The format '{pattern}' ends with an unfinished escape")]
    DanglingEscape { pattern: String },

    #[error("Not enough data available to satisfy format")]
    NotEnoughData,

    #[error("Trailing data '{rest}'")]
    TrailingData { rest: String },

    #[error("Expected {expected}, found '{found}'")]
    Unexpected { expected: &'static str, found: String },

    #[error("Hour cannot be higher than 12, got {hour}")]
    TwelveHourClock { hour: i64 },

    #[error("Unknown or bad timezone ({name})")]
    UnknownZone { name: String },

    #[error("The local time {local} does not exist in timezone {zone}")]
    NonexistentLocalTime { local: String, zone: String },

    #[error("The parsed date is outside the supported range")]
    OutOfRange,
}

/// Zone details beyond the UTC offset that some pattern letters print.
pub trait ZoneLabel: TimeZone {
    /// Printed by `e`.
    fn label(&self) -> String;

    /// Printed by `I`.
    fn is_dst(offset: &Self::Offset) -> bool;
}

impl ZoneLabel for Tz {
    fn label(&self) -> String {
        self.name().to_owned()
    }

    fn is_dst(offset: &Self::Offset) -> bool {
        !offset.dst_offset().is_zero()
    }
}

/// A bare offset names itself: `+05:30`.
impl ZoneLabel for FixedOffset {
    fn label(&self) -> String {
        self.to_string()
    }

    fn is_dst(_offset: &Self::Offset) -> bool {
        false
    }
}

/// Render `instant` following `pattern`.
pub fn render<Z>(instant: &DateTime<Z>, pattern: &str) -> Result<String, PatternError>
where
    Z: ZoneLabel,
    Z::Offset: fmt::Display,
{
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(literal) => out.push(literal),
                None => {
                    return Err(PatternError::DanglingEscape {
                        pattern: pattern.to_owned(),
                    });
                }
            }
            continue;
        }
        render_char(instant, c, &mut out)?;
    }
    Ok(out)
}

fn render_char<Z>(dt: &DateTime<Z>, c: char, out: &mut String) -> Result<(), PatternError>
where
    Z: ZoneLabel,
    Z::Offset: fmt::Display,
{
    let year = i64::from(dt.year());
    match c {
        // Day
        'd' => out.push_str(&format!("{:02}", dt.day())),
        'D' => out.push_str(&weekday_name(dt.weekday())[..3]),
        'j' => out.push_str(&dt.day().to_string()),
        'l' => out.push_str(weekday_name(dt.weekday())),
        'N' => out.push_str(&dt.weekday().number_from_monday().to_string()),
        'S' => out.push_str(ordinal_suffix(dt.day())),
        'w' => out.push_str(&dt.weekday().num_days_from_sunday().to_string()),
        'z' => out.push_str(&dt.ordinal0().to_string()),
        // Week
        'W' => out.push_str(&format!("{:02}", dt.iso_week().week())),
        // Month
        'F' => out.push_str(month_name(dt.month())),
        'm' => out.push_str(&format!("{:02}", dt.month())),
        'M' => out.push_str(&month_name(dt.month())[..3]),
        'n' => out.push_str(&dt.month().to_string()),
        't' => out.push_str(&days_in_month(year, i64::from(dt.month())).to_string()),
        // Year
        'L' => out.push(if is_leap_year(year) { '1' } else { '0' }),
        'o' => out.push_str(&dt.iso_week().year().to_string()),
        'Y' if year < 0 => out.push_str(&format!("-{:04}", -year)),
        'Y' => out.push_str(&format!("{year:04}")),
        'y' => out.push_str(&format!("{:02}", year.rem_euclid(100))),
        // Time
        'a' => out.push_str(if dt.hour12().0 { "pm" } else { "am" }),
        'A' => out.push_str(if dt.hour12().0 { "PM" } else { "AM" }),
        'B' => out.push_str(&format!("{:03}", swatch_beat(dt))),
        'g' => out.push_str(&dt.hour12().1.to_string()),
        'G' => out.push_str(&dt.hour().to_string()),
        'h' => out.push_str(&format!("{:02}", dt.hour12().1)),
        'H' => out.push_str(&format!("{:02}", dt.hour())),
        'i' => out.push_str(&format!("{:02}", dt.minute())),
        's' => out.push_str(&format!("{:02}", dt.second())),
        'u' => out.push_str(&format!("{:06}", dt.nanosecond() % 1_000_000_000 / 1_000)),
        'v' => out.push_str(&format!("{:03}", dt.nanosecond() % 1_000_000_000 / 1_000_000)),
        // Timezone
        'e' => out.push_str(&dt.timezone().label()),
        'I' => out.push(if Z::is_dst(dt.offset()) { '1' } else { '0' }),
        'O' => out.push_str(&dt.format("%z").to_string()),
        'P' => out.push_str(&dt.format("%:z").to_string()),
        'p' if dt.offset().fix().local_minus_utc() == 0 => out.push('Z'),
        'p' => out.push_str(&dt.format("%:z").to_string()),
        'T' => out.push_str(&dt.format("%Z").to_string()),
        'Z' => out.push_str(&dt.offset().fix().local_minus_utc().to_string()),
        // Full date/time
        'c' => out.push_str(&render(dt, "Y-m-d\\TH:i:sP")?),
        'r' => out.push_str(&render(dt, "D, d M Y H:i:s O")?),
        'U' => out.push_str(&dt.timestamp().to_string()),
        other => out.push(other),
    }
    Ok(())
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Swatch Internet time: thousandths of a day in UTC+1.
fn swatch_beat<Z: TimeZone>(dt: &DateTime<Z>) -> i64 {
    (dt.timestamp() + 3600).rem_euclid(86_400) * 10 / 864
}

/// Drop the parse-only `!` and `|` markers so a pattern used for parsing can
/// be rendered again for comparison.
pub fn strip_parse_modifiers(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '!' | '|' => {}
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParsedZone {
    Fixed(i32),
    Named(Tz),
}

#[derive(Debug, Default)]
struct Fields {
    year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
    day_of_year: Option<i64>,
    hour: Option<i64>,
    minute: Option<i64>,
    second: Option<i64>,
    nanos: Option<u32>,
    pm: Option<bool>,
    timestamp: Option<i64>,
    zone: Option<ParsedZone>,
    epoch_defaults: bool,
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn found(&self) -> Result<String, PatternError> {
        match self.rest().chars().next() {
            Some(c) => Ok(c.to_string()),
            None => Err(PatternError::NotEnoughData),
        }
    }

    fn digits(&mut self, min: usize, max: usize, expected: &'static str) -> Result<i64, PatternError> {
        let len = self
            .rest()
            .bytes()
            .take(max)
            .take_while(u8::is_ascii_digit)
            .count();
        if len < min {
            return Err(PatternError::Unexpected {
                expected,
                found: self.found()?,
            });
        }
        let value = self.rest()[..len]
            .parse()
            .map_err(|_| PatternError::OutOfRange)?;
        self.pos += len;
        Ok(value)
    }

    /// Digits read as a decimal fraction, scaled to nanoseconds.
    fn fraction(&mut self, max: usize, expected: &'static str) -> Result<u32, PatternError> {
        let start = self.pos;
        let value = self.digits(1, max, expected)?;
        let width = u32::try_from(self.pos - start).map_err(|_| PatternError::OutOfRange)?;
        let nanos = value * 10i64.pow(9 - width);
        u32::try_from(nanos).map_err(|_| PatternError::OutOfRange)
    }

    fn signed(&mut self, expected: &'static str) -> Result<i64, PatternError> {
        let negative = match self.rest().as_bytes().first() {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };
        let value = self.digits(1, 19, expected)?;
        Ok(if negative { -value } else { value })
    }

    fn word(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphabetic() || *b == b'.')
            .count();
        self.pos += len;
        &rest[..len]
    }

    fn zone_text(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || b"/_+-:".contains(b))
            .count();
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) {
        let len = self.rest().len() - self.rest().trim_start().len();
        self.pos += len;
    }

    fn literal(&mut self, expected: char) -> Result<(), PatternError> {
        match self.rest().chars().next() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(PatternError::Unexpected {
                expected: "a literal character",
                found: c.to_string(),
            }),
            None => Err(PatternError::NotEnoughData),
        }
    }

    fn any_char(&mut self) -> Result<(), PatternError> {
        let c = self.rest().chars().next().ok_or(PatternError::NotEnoughData)?;
        self.pos += c.len_utf8();
        Ok(())
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ";:/.,-()".contains(c)
}

/// What [`read`] found in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub instant: DateTime<Tz>,
    /// The numeric offset written in the input, if any. Offsets that are not
    /// whole hours have no [`Tz`], so `instant` alone may not carry it.
    pub offset: Option<FixedOffset>,
}

impl Reading {
    /// Render in the zone the input was written in.
    pub fn render(&self, pattern: &str) -> Result<String, PatternError> {
        match self.offset {
            Some(offset) => render(&self.instant.with_timezone(&offset), pattern),
            None => render(&self.instant, pattern),
        }
    }
}

/// Read `input` following `pattern`, keeping only the instant.
pub fn parse(
    pattern: &str,
    input: &str,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<DateTime<Tz>, PatternError> {
    read(pattern, input, tz, now).map(|reading| reading.instant)
}

/// Read `input` following `pattern`.
///
/// Fields the pattern does not mention are taken from `now` in the target
/// zone; once any time field is read, the others default to zero. `!` and
/// `|` switch the defaults to the Unix epoch. A zone read from the input
/// replaces `tz`; a Unix timestamp without a zone is placed in UTC.
pub fn read(
    pattern: &str,
    input: &str,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<Reading, PatternError> {
    let mut fields = Fields::default();
    let mut scanner = Scanner { input, pos: 0 };
    let mut chars = pattern.chars();
    let mut allow_trailing = false;

    while let Some(c) = chars.next() {
        match c {
            'd' | 'j' => fields.day = Some(scanner.digits(1, 2, "a day of the month")?),
            'D' | 'l' => {
                let name = scanner.word();
                if weekday_from_name(name).is_none() {
                    return Err(PatternError::Unexpected {
                        expected: "a day name",
                        found: name.to_owned(),
                    });
                }
            }
            'S' => {
                let suffix = scanner.word().to_ascii_lowercase();
                if !matches!(suffix.as_str(), "st" | "nd" | "rd" | "th") {
                    return Err(PatternError::Unexpected {
                        expected: "an ordinal suffix",
                        found: suffix,
                    });
                }
            }
            'z' => fields.day_of_year = Some(scanner.digits(1, 3, "a day of the year")?),
            'F' | 'M' => {
                let name = scanner.word();
                fields.month = Some(month_from_name(name).ok_or_else(|| PatternError::Unexpected {
                    expected: "a month name",
                    found: name.to_owned(),
                })?);
            }
            'm' | 'n' => fields.month = Some(scanner.digits(1, 2, "a month")?),
            'Y' => fields.year = Some(scanner.digits(1, 4, "a year")?),
            'y' => {
                let short = scanner.digits(2, 2, "a two digit year")?;
                fields.year = Some(if short < 70 { 2000 + short } else { 1900 + short });
            }
            'a' | 'A' => {
                let word = scanner.word().to_ascii_lowercase();
                fields.pm = Some(match word.as_str() {
                    "am" | "a.m." => false,
                    "pm" | "p.m." => true,
                    _ => {
                        return Err(PatternError::Unexpected {
                            expected: "a meridian",
                            found: word,
                        });
                    }
                });
            }
            'g' | 'h' => {
                let hour = scanner.digits(1, 2, "an hour")?;
                if hour > 12 {
                    return Err(PatternError::TwelveHourClock { hour });
                }
                fields.hour = Some(hour);
            }
            'G' | 'H' => fields.hour = Some(scanner.digits(1, 2, "an hour")?),
            'i' => fields.minute = Some(scanner.digits(2, 2, "two digit minutes")?),
            's' => fields.second = Some(scanner.digits(2, 2, "two digit seconds")?),
            'u' => fields.nanos = Some(scanner.fraction(6, "microseconds")?),
            'v' => fields.nanos = Some(scanner.fraction(3, "milliseconds")?),
            'U' => fields.timestamp = Some(scanner.signed("a Unix timestamp")?),
            'e' | 'T' | 'O' | 'P' | 'p' => {
                let text = scanner.zone_text();
                fields.zone = Some(read_zone(text)?);
            }
            '!' => {
                fields = Fields {
                    epoch_defaults: true,
                    ..Fields::default()
                };
            }
            '|' => fields.epoch_defaults = true,
            '?' => scanner.any_char()?,
            '*' => {
                let len = scanner
                    .rest()
                    .find(|c: char| is_separator(c) || c.is_ascii_digit())
                    .unwrap_or(scanner.rest().len());
                scanner.pos += len;
            }
            '+' => {
                allow_trailing = true;
                break;
            }
            '#' => match scanner.rest().chars().next() {
                Some(sep) if ";:/.,-()".contains(sep) => scanner.pos += sep.len_utf8(),
                Some(other) => {
                    return Err(PatternError::Unexpected {
                        expected: "a separation symbol",
                        found: other.to_string(),
                    });
                }
                None => return Err(PatternError::NotEnoughData),
            },
            ' ' => scanner.skip_whitespace(),
            '\\' => {
                let literal = chars.next().ok_or_else(|| PatternError::DanglingEscape {
                    pattern: pattern.to_owned(),
                })?;
                scanner.literal(literal)?;
            }
            literal => scanner.literal(literal)?,
        }
    }

    if !allow_trailing && !scanner.rest().is_empty() {
        return Err(PatternError::TrailingData {
            rest: scanner.rest().to_owned(),
        });
    }

    let offset = match fields.zone {
        Some(ParsedZone::Fixed(seconds)) => FixedOffset::east_opt(seconds),
        _ => None,
    };
    Ok(Reading {
        instant: assemble(&fields, tz, now)?,
        offset,
    })
}

fn read_zone(text: &str) -> Result<ParsedZone, PatternError> {
    let unknown = || PatternError::UnknownZone {
        name: text.to_owned(),
    };
    if text.is_empty() {
        return Err(PatternError::NotEnoughData);
    }
    if text.starts_with(['+', '-']) {
        return parse_offset(text).map(ParsedZone::Fixed).ok_or_else(unknown);
    }
    parse_zone_name(text).map(ParsedZone::Named).ok_or_else(unknown)
}

fn parse_offset(text: &str) -> Option<i32> {
    let sign = if text.starts_with('-') { -1 } else { 1 };
    let body: String = text[1..].chars().filter(|c| *c != ':').collect();
    if !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match body.len() {
        1 | 2 => (body.parse::<i32>().ok()?, 0),
        4 => (body[..2].parse::<i32>().ok()?, body[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    (hours <= 23 && minutes <= 59).then_some(sign * (hours * 3600 + minutes * 60))
}

/// A whole-hour offset expressed as an `Etc/GMT` zone, so it survives
/// being stored as a [`Tz`].
fn fixed_zone(seconds: i32) -> Option<Tz> {
    if seconds % 3600 != 0 {
        return None;
    }
    let hours = -seconds / 3600;
    let name = if hours == 0 {
        "Etc/GMT".to_owned()
    } else {
        format!("Etc/GMT{hours:+}")
    };
    name.parse().ok()
}

fn assemble(fields: &Fields, tz: Tz, now: DateTime<Utc>) -> Result<DateTime<Tz>, PatternError> {
    if let Some(ts) = fields.timestamp {
        let utc = DateTime::from_timestamp(ts, fields.nanos.unwrap_or(0))
            .ok_or(PatternError::OutOfRange)?;
        let zone = match fields.zone {
            Some(ParsedZone::Named(named)) => named,
            Some(ParsedZone::Fixed(seconds)) => fixed_zone(seconds).unwrap_or(tz),
            None => Tz::UTC,
        };
        return Ok(utc.with_timezone(&zone));
    }

    let zone = match fields.zone {
        Some(ParsedZone::Named(named)) => named,
        Some(ParsedZone::Fixed(seconds)) => fixed_zone(seconds).unwrap_or(tz),
        None => tz,
    };
    let reference = if fields.epoch_defaults {
        DateTime::<Utc>::UNIX_EPOCH.naive_utc()
    } else {
        now.with_timezone(&zone).naive_local()
    };

    let year = fields.year.unwrap_or_else(|| i64::from(reference.year()));
    let date = match fields.day_of_year {
        Some(ordinal) => add_days(ymd(year, 1, 1).ok_or(PatternError::OutOfRange)?, ordinal)?,
        None => {
            let month = fields.month.unwrap_or_else(|| i64::from(reference.month()));
            let day = fields.day.unwrap_or_else(|| i64::from(reference.day()));
            // Out-of-range months and days roll over the way mktime does.
            let first = ymd(year, 1, 1).ok_or(PatternError::OutOfRange)?;
            let first_of_month = add_months(first, month - 1)?;
            add_days(first_of_month, day - 1)?
        }
    };

    let any_time = fields.hour.is_some()
        || fields.minute.is_some()
        || fields.second.is_some()
        || fields.nanos.is_some();
    let (hour, minute, second, nanos) = if any_time || fields.epoch_defaults {
        let mut hour = fields.hour.unwrap_or(0);
        if let Some(pm) = fields.pm {
            hour = match (pm, hour) {
                (false, 12) => 0,
                (true, h) if h != 12 => h + 12,
                (_, h) => h,
            };
        }
        (
            hour,
            fields.minute.unwrap_or(0),
            fields.second.unwrap_or(0),
            fields.nanos.unwrap_or(0),
        )
    } else {
        (
            i64::from(reference.hour()),
            i64::from(reference.minute()),
            i64::from(reference.second()),
            reference.nanosecond(),
        )
    };

    let clock = TimeDelta::try_seconds(hour * 3600 + minute * 60 + second)
        .ok_or(PatternError::OutOfRange)?
        + TimeDelta::nanoseconds(i64::from(nanos));
    let naive = NaiveDateTime::new(date, NaiveTime::default())
        .checked_add_signed(clock)
        .ok_or(PatternError::OutOfRange)?;

    match fields.zone {
        Some(ParsedZone::Fixed(seconds)) if fixed_zone(seconds).is_none() => {
            FixedOffset::east_opt(seconds)
                .and_then(|offset| offset.from_local_datetime(&naive).single())
                .map(|dt| dt.with_timezone(&tz))
                .ok_or(PatternError::OutOfRange)
        }
        _ => localize(&zone, &naive).ok_or_else(|| PatternError::NonexistentLocalTime {
            local: naive.to_string(),
            zone: zone.name().to_owned(),
        }),
    }
}

fn add_months(date: chrono::NaiveDate, months: i64) -> Result<chrono::NaiveDate, PatternError> {
    let amount = chrono::Months::new(u32::try_from(months.unsigned_abs()).map_err(|_| PatternError::OutOfRange)?);
    let shifted = if months >= 0 {
        date.checked_add_months(amount)
    } else {
        date.checked_sub_months(amount)
    };
    shifted.ok_or(PatternError::OutOfRange)
}

fn add_days(date: chrono::NaiveDate, days: i64) -> Result<chrono::NaiveDate, PatternError> {
    let amount = chrono::Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(amount)
    } else {
        date.checked_sub_days(amount)
    };
    shifted.ok_or(PatternError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Tz> {
        Tz::Europe__Paris
            .with_ymd_and_hms(y, m, d, h, min, s)
            .single()
            .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 15, 10, 20, 30).single().unwrap()
    }

    #[test]
    fn renders_canonical_and_rfc7231() {
        let dt = paris(1994, 11, 6, 8, 49, 37);
        assert_eq!(render(&dt, "Y-m-d H:i:s").unwrap(), "1994-11-06 08:49:37");
        assert_eq!(
            render(&dt, "D, d M Y H:i:s \\G\\M\\T").unwrap(),
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
    }

    #[test]
    fn renders_day_and_month_names() {
        let dt = paris(2020, 6, 1, 15, 4, 5);
        assert_eq!(render(&dt, "l jS F").unwrap(), "Monday 1st June");
        assert_eq!(render(&dt, "N w z t L").unwrap(), "1 1 152 30 1");
        assert_eq!(render(&paris(2020, 6, 12, 0, 0, 0), "jS").unwrap(), "12th");
        assert_eq!(render(&paris(2020, 6, 22, 0, 0, 0), "jS").unwrap(), "22nd");
    }

    #[test]
    fn renders_twelve_hour_clock() {
        let dt = paris(2020, 6, 1, 15, 4, 5);
        assert_eq!(render(&dt, "g:i a / h A / G").unwrap(), "3:04 pm / 03 PM / 15");
    }

    #[test]
    fn renders_zone_fields() {
        let summer = paris(2020, 6, 1, 12, 0, 0);
        assert_eq!(render(&summer, "e T O P Z I").unwrap(), "Europe/Paris CEST +0200 +02:00 7200 1");
        let utc = Tz::UTC.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single().unwrap();
        assert_eq!(render(&utc, "p I").unwrap(), "Z 0");
    }

    #[test]
    fn renders_composites() {
        let dt = paris(2004, 2, 12, 15, 19, 21);
        assert_eq!(render(&dt, "c").unwrap(), "2004-02-12T15:19:21+01:00");
        assert_eq!(render(&dt, "r").unwrap(), "Thu, 12 Feb 2004 15:19:21 +0100");
        assert_eq!(render(&dt, "U").unwrap(), dt.timestamp().to_string());
    }

    #[test]
    fn short_years_are_zero_padded() {
        let dt = Tz::UTC.with_ymd_and_hms(11, 3, 4, 0, 0, 0).single().unwrap();
        assert_eq!(render(&dt, "Y").unwrap(), "0011");
        assert_eq!(render(&dt, "y").unwrap(), "11");
    }

    #[test]
    fn dangling_escape_fails_to_render() {
        let dt = paris(2020, 6, 1, 0, 0, 0);
        assert!(matches!(render(&dt, "Y\\"), Err(PatternError::DanglingEscape { .. })));
    }

    #[test]
    fn parses_canonical_format() {
        let dt = parse("Y-m-d H:i:s", "2020-06-15 14:30:00", Tz::Europe__Paris, now()).unwrap();
        assert_eq!(dt, paris(2020, 6, 15, 14, 30, 0));
    }

    #[test]
    fn missing_fields_come_from_now() {
        let dt = parse("Y-m-d", "2020-06-15", Tz::UTC, now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2020-06-15T10:20:30+00:00");
        let dt = parse("H:i", "08:05", Tz::UTC, now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2021-06-15T08:05:00+00:00");
    }

    #[test]
    fn bang_resets_to_epoch() {
        let dt = parse("!Y-m-d", "2020-06-15", Tz::UTC, now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2020-06-15T00:00:00+00:00");
        let dt = parse("H:i|", "08:05", Tz::UTC, now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "1970-01-01T08:05:00+00:00");
    }

    #[test]
    fn calendar_overflow_rolls_over() {
        let dt = parse("!Y-m-d", "2011-02-30", Tz::UTC, now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2011-03-02T00:00:00+00:00");
    }

    #[test]
    fn four_digit_year_accepts_short_input() {
        let dt = parse("!Y", "11", Tz::UTC, now()).unwrap();
        assert_eq!(dt.year(), 11);
        assert_eq!(render(&dt, "Y").unwrap(), "0011");
    }

    #[test]
    fn reads_names_and_meridian() {
        let dt = parse("D, d M Y g:i a", "Sun, 06 Nov 1994 8:49 pm", Tz::UTC, now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "1994-11-06T20:49:00+00:00");
    }

    #[test]
    fn reads_zones() {
        let dt = parse("Y-m-d H:i e", "2020-06-15 14:30 Asia/Tokyo", Tz::UTC, now()).unwrap();
        assert_eq!(dt.timezone(), Tz::Asia__Tokyo);
        let dt = parse("Y-m-d H:i P", "2020-06-15 14:30 +05:00", Tz::UTC, now()).unwrap();
        assert_eq!(render(&dt, "Y-m-d H:i P").unwrap(), "2020-06-15 14:30 +05:00");
        let dt = parse("Y-m-d H:i O", "2020-06-15 14:30 +0530", Tz::UTC, now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2020-06-15T09:00:00+00:00");
    }

    #[test]
    fn readings_render_in_their_own_offset() {
        let reading = read("Y-m-d H:i O", "2020-06-15 14:30 +0530", Tz::UTC, now()).unwrap();
        assert_eq!(reading.offset, FixedOffset::east_opt(19_800));
        assert_eq!(reading.render("Y-m-d H:i O").unwrap(), "2020-06-15 14:30 +0530");
        assert_eq!(reading.render("e T I").unwrap(), "+05:30 +05:30 0");

        let whole = read("Y-m-d H:i P", "2020-06-15 14:30 -03:00", Tz::UTC, now()).unwrap();
        assert_eq!(whole.render("Y-m-d H:i e").unwrap(), "2020-06-15 14:30 -03:00");

        let named = read("Y-m-d H:i e", "2020-06-15 14:30 Asia/Tokyo", Tz::UTC, now()).unwrap();
        assert_eq!(named.offset, None);
        assert_eq!(named.render("e").unwrap(), "Asia/Tokyo");
    }

    #[test]
    fn timestamp_without_zone_is_utc() {
        let dt = parse("U", "1592231400", Tz::Europe__Paris, now()).unwrap();
        assert_eq!(dt.timezone(), Tz::UTC);
        assert_eq!(dt.timestamp(), 1_592_231_400);
    }

    #[test]
    fn wildcards() {
        let dt = parse("!Y-m-d+", "2020-06-15 and more", Tz::UTC, now()).unwrap();
        assert_eq!(dt.day(), 15);
        let dt = parse("!?Y*#m#d", "x2020abc/06/15", Tz::UTC, now()).unwrap();
        assert_eq!(dt.month(), 6);
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(
            parse("Y-m-d", "2020-06-15 10:00", Tz::UTC, now()),
            Err(PatternError::TrailingData { rest: " 10:00".into() })
        );
        assert_eq!(
            parse("Y-m-d H", "2020-06-15", Tz::UTC, now()),
            Err(PatternError::NotEnoughData)
        );
        assert!(matches!(
            parse("Y-m-d", "June 15", Tz::UTC, now()),
            Err(PatternError::Unexpected { .. })
        ));
        assert!(matches!(
            parse("h:i", "13:00", Tz::UTC, now()),
            Err(PatternError::TwelveHourClock { hour: 13 })
        ));
    }

    #[test]
    fn gap_is_reported() {
        let err = parse("Y-m-d H:i", "2021-03-28 02:30", Tz::Europe__Paris, now()).unwrap_err();
        assert!(matches!(err, PatternError::NonexistentLocalTime { .. }));
    }

    #[test]
    fn strips_parse_markers_only() {
        assert_eq!(strip_parse_modifiers("!Y-m-d|"), "Y-m-d");
        assert_eq!(strip_parse_modifiers("\\!Y"), "\\!Y");
    }
}
