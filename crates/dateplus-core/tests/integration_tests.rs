//! Integration tests for dateplus-core.

use chrono::{Datelike, Weekday};
use chrono_tz::Tz;
use dateplus_core::{
    domain::{DateParts, PART_KEYS},
    prelude::*,
};

fn settings() -> Settings {
    Settings::default()
}

#[test]
fn valid_parts_round_trip_through_format() {
    let samples = [
        (2020, 2, 29),
        (2021, 12, 31),
        (1999, 1, 1),
        (5, 7, 4),
        (2400, 2, 29),
        (1970, 6, 30),
    ];
    for (year, month, day) in samples {
        let parts = DateParts::new().year(year).month(month).day(day);
        let mut date = DateValue::from_parts(&parts, "UTC", &settings()).unwrap();
        assert_eq!(
            date.format("Y-m-d"),
            Some(format!("{year:04}-{month:02}-{day:02}")),
            "{parts:?}"
        );
    }
}

#[test]
fn february_thirtieth_is_never_normalised() {
    let parts = DateParts::new().year(2011).month(2).day(30);
    let err = DateValue::from_parts(&parts, "UTC", &settings()).unwrap_err();
    assert!(matches!(err, DateError::InvalidParts { .. }));

    let mut text = DateValue::from_time("2011-02-30", "UTC", &settings());
    assert!(text.has_errors());
    assert_eq!(text.format("Y-m-d"), None);
}

#[test]
fn unparsable_text_is_unformattable() {
    let mut date = DateValue::from_time("not a date", "UTC", &settings());
    assert!(date.has_errors());
    assert_eq!(date.instant(), None);
    assert_eq!(date.format(DateValue::FORMAT), None);
    assert_eq!(date.timestamp(), None);
}

#[test]
fn arbitrary_text_never_panics() {
    let inputs = [
        "+\u{20ac}1",
        "2020-06-15 +\u{20ac}1",
        "14:30+\u{20ac}a",
        "-\u{e9}",
        "@",
        "@\u{20ac}",
        "2020--",
        "99999999999:00",
        "2020-06-15T",
        "\u{1f4c5} tomorrow",
        "15.\u{e9}.2020",
        "+99999999999 days",
    ];
    for input in inputs {
        let mut date = DateValue::from_time(input, "UTC", &settings());
        assert!(date.has_errors(), "{input}");
        assert_eq!(date.format(DateValue::FORMAT), None, "{input}");
    }
}

#[test]
fn fractional_hour_offsets_survive_from_format() {
    let mut date =
        DateValue::from_format("Y-m-d H:i O", "2020-06-15 14:30 +0530", "UTC", &settings()).unwrap();
    assert_eq!(date.timestamp(), Some(1_592_211_600));
    assert!(!date.has_errors());
}

#[test]
fn four_digit_year_rejects_two_digits() {
    let err = DateValue::from_format("Y", "11", "UTC", &settings()).unwrap_err();
    assert!(err.to_string().contains("does not match the input value"));
}

#[test]
fn midnight_keeps_the_day() {
    let mut date = DateValue::from_time("2020-06-15 14:30:00", "Europe/Paris", &settings());
    date.midnight();
    assert_eq!(date.format(DateValue::FORMAT).as_deref(), Some("2020-06-15 00:00:00"));
    date.end_of_day().beginning_of_day();
    assert_eq!(date.format(DateValue::FORMAT).as_deref(), Some("2020-06-15 00:00:00"));
}

#[test]
fn third_tuesday_is_occurrence_three() {
    // June 2020: Tuesdays fall on the 2nd, 9th, 16th, 23rd and 30th.
    let date = DateValue::from_time("2020-06-16 08:00", "UTC", &settings());
    assert_eq!(date.day_occurrence_of_month(), Some(3));
}

#[test]
fn first_sunday_of_february_2021() {
    let date = DateValue::from_day_of_month(1, Weekday::Sun, Some(2), Some(2021)).unwrap();
    let instant = date.instant().unwrap();
    assert_eq!((instant.year(), instant.month(), instant.day()), (2021, 2, 7));
    assert_eq!(instant.weekday(), Weekday::Sun);
}

#[test]
fn nth_weekday_and_occurrence_agree() {
    for occurrence in 1..=4 {
        for weekday in [Weekday::Mon, Weekday::Thu, Weekday::Sat] {
            let date =
                DateValue::from_day_of_month(occurrence, weekday, Some(9), Some(2022)).unwrap();
            assert_eq!(date.day_occurrence_of_month(), Some(occurrence));
        }
    }
}

#[test]
fn error_lists_are_stable_and_distinct() {
    let date = DateValue::from_time("foo bar foo", "Mars/Base", &settings());
    let first = date.errors().to_vec();
    assert_eq!(date.errors(), first.as_slice());
    assert_eq!(date.errors(), first.as_slice());

    let mut seen = first.clone();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), first.len());
    assert_eq!(first[0], "Unknown or bad timezone (Mars/Base)");
}

#[test]
fn parts_from_form_input() {
    let form: std::collections::HashMap<&str, &str> = PART_KEYS
        .iter()
        .copied()
        .zip(["2020", "6", "15", "9", "5", ""])
        .collect();
    let parts = DateParts::from_map(&form).unwrap();
    let mut date = DateValue::from_parts(&parts, Tz::Asia__Tokyo, &settings()).unwrap();
    assert_eq!(date.format("c").as_deref(), Some("2020-06-15T09:05:00+09:00"));
}

#[test]
fn service_and_value_agree() {
    let service = DateService::new("Europe/Paris", settings());
    let mut from_service = service.parse("2020-06-15 14:30");
    let mut direct = DateValue::from_time("2020-06-15 14:30", "Europe/Paris", &settings());
    assert_eq!(from_service.format("U"), direct.format("U"));
}

#[test]
fn timestamp_then_zone_change() {
    let mut date = DateValue::from_timestamp(0, "UTC", &settings()).unwrap();
    date.set_timezone(Tz::America__New_York);
    assert_eq!(date.format("Y-m-d H:i T").as_deref(), Some("1969-12-31 19:00 EST"));
    assert_eq!(date.timestamp(), Some(0));
}

#[test]
fn http_dates_parse_and_render() {
    let mut date = DateValue::from_time("Sun, 06 Nov 1994 08:49:37 GMT", "Europe/Paris", &settings());
    assert!(!date.has_errors(), "{:?}", date.errors());
    assert_eq!(
        date.format(DateValue::RFC7231).as_deref(),
        Some("Sun, 06 Nov 1994 08:49:37 GMT")
    );
}
