//! Timezone resolution.
//!
//! Every [`DateValue`](crate::domain::DateValue) carries a resolved zone. The
//! caller may hand over a zone, a zone name, or nothing; the first usable
//! input wins:
//!
//! 1. an explicit [`Tz`]
//! 2. a non-empty IANA name
//! 3. the process-wide default set with [`set_default_timezone`]
//! 4. `UTC`

use std::fmt;
use std::sync::RwLock;

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

static DEFAULT_TIMEZONE: RwLock<Option<Tz>> = RwLock::new(None);

/// Set the zone used when a constructor receives no timezone.
pub fn set_default_timezone(tz: Tz) {
    let mut slot = DEFAULT_TIMEZONE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = Some(tz);
}

/// Forget the process-wide zone; constructors fall back to `UTC` again.
pub fn clear_default_timezone() {
    let mut slot = DEFAULT_TIMEZONE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = None;
}

/// The process-wide default zone, or `UTC` when none was configured.
pub fn default_timezone() -> Tz {
    DEFAULT_TIMEZONE
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .unwrap_or(Tz::UTC)
}

/// Timezone argument accepted by every constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimeZoneInput {
    /// Use this zone as is.
    Zone(Tz),
    /// Look the zone up by IANA name. Empty names count as absent.
    Name(String),
    /// Use the process-wide default.
    #[default]
    Default,
}

impl TimeZoneInput {
    /// Resolve to a concrete zone.
    ///
    /// An unknown name is not fatal here: the default zone is returned along
    /// with a message the caller records as a soft error.
    pub fn resolve(&self) -> (Tz, Option<String>) {
        match self {
            Self::Zone(tz) => (*tz, None),
            Self::Name(name) if !name.trim().is_empty() => match parse_zone_name(name) {
                Some(tz) => (tz, None),
                None => (
                    default_timezone(),
                    Some(format!("Unknown or bad timezone ({})", name.trim())),
                ),
            },
            Self::Name(_) | Self::Default => (default_timezone(), None),
        }
    }
}

impl fmt::Display for TimeZoneInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zone(tz) => f.write_str(tz.name()),
            Self::Name(name) => f.write_str(name),
            Self::Default => f.write_str("default"),
        }
    }
}

impl From<Tz> for TimeZoneInput {
    fn from(tz: Tz) -> Self {
        Self::Zone(tz)
    }
}

impl From<&str> for TimeZoneInput {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for TimeZoneInput {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl<T: Into<TimeZoneInput>> From<Option<T>> for TimeZoneInput {
    fn from(input: Option<T>) -> Self {
        input.map_or(Self::Default, Into::into)
    }
}

/// Parse an IANA zone name, accepting the `Z`/`UTC`/`GMT` shorthands.
pub(crate) fn parse_zone_name(name: &str) -> Option<Tz> {
    let name = name.trim();
    if ["z", "utc", "gmt"].contains(&name.to_ascii_lowercase().as_str()) {
        return Some(Tz::UTC);
    }
    name.parse::<Tz>().ok()
}

/// Attach `tz` to a wall-clock reading.
///
/// Ambiguous readings (the repeated hour when clocks go back) resolve to the
/// earlier instant. Readings inside a gap have no instant and yield `None`.
pub(crate) fn localize(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(naive).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn explicit_zone_wins() {
        let (tz, err) = TimeZoneInput::from(Tz::Asia__Tokyo).resolve();
        assert_eq!(tz, Tz::Asia__Tokyo);
        assert!(err.is_none());
    }

    #[test]
    fn zone_name_is_looked_up() {
        let (tz, err) = TimeZoneInput::from("Europe/Paris").resolve();
        assert_eq!(tz, Tz::Europe__Paris);
        assert!(err.is_none());
    }

    #[test]
    fn unknown_name_reports_and_falls_back() {
        let (_, err) = TimeZoneInput::from("Mars/Olympus").resolve();
        assert_eq!(err.as_deref(), Some("Unknown or bad timezone (Mars/Olympus)"));
    }

    #[test]
    fn empty_name_counts_as_absent() {
        let (_, err) = TimeZoneInput::from("  ").resolve();
        assert!(err.is_none());
    }

    #[test]
    fn option_none_means_default() {
        assert_eq!(TimeZoneInput::from(None::<&str>), TimeZoneInput::Default);
    }

    #[test]
    fn shorthands_map_to_utc() {
        assert_eq!(parse_zone_name("Z"), Some(Tz::UTC));
        assert_eq!(parse_zone_name("gmt"), Some(Tz::UTC));
    }

    #[test]
    fn gap_has_no_instant() {
        // Clocks in Paris jumped from 02:00 to 03:00 on 2021-03-28.
        let naive = NaiveDate::from_ymd_opt(2021, 3, 28)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert!(localize(&Tz::Europe__Paris, &naive).is_none());
    }

    #[test]
    fn overlap_takes_earlier_instant() {
        // 02:30 happened twice in Paris on 2021-10-31.
        let naive = NaiveDate::from_ymd_opt(2021, 10, 31)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let dt = localize(&Tz::Europe__Paris, &naive).unwrap();
        assert_eq!(dt.to_rfc3339(), "2021-10-31T02:30:00+02:00");
    }
}
