//! Time-of-day handling for prayer timings.
//!
//! Aladhan provides times as "HH:MM" strings, sometimes followed by a
//! timezone annotation such as "05:12 (IST)". This module parses those
//! strings without ever failing loudly: malformed input is handed back
//! unchanged so that one bad value cannot break a whole schedule.
//!
//! Times here carry no date. Arithmetic wraps at midnight and does not
//! advance any associated calendar day.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// A clock time parsed from an Aladhan timing string.
///
/// # Examples
///
/// ```
/// use prayer_server::domain::{ParsedTime, parse_time};
///
/// let ParsedTime::Parsed(t) = parse_time("05:12 (IST)") else {
///     panic!("expected a valid time");
/// };
/// assert_eq!(t.hour(), 5);
/// assert_eq!(t.minute(), 12);
/// assert_eq!(t.suffix(), " (IST)");
/// assert_eq!(t.to_string(), "05:12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
    suffix: String,
}

/// Outcome of parsing a timing string.
///
/// Parsing never errors: a string that does not match the expected shape
/// is returned as-is in [`ParsedTime::Unchanged`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTime {
    Parsed(TimeOfDay),
    Unchanged(String),
}

impl ParsedTime {
    /// Returns the parsed time, if any.
    pub fn into_time(self) -> Option<TimeOfDay> {
        match self {
            ParsedTime::Parsed(t) => Some(t),
            ParsedTime::Unchanged(_) => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ParsedTime::Parsed(_))
    }
}

impl TimeOfDay {
    /// Create a time from components, normalizing them into range.
    pub fn new(hour: u32, minute: u32) -> Self {
        Self::from_minutes(i64::from(hour) * 60 + i64::from(minute))
    }

    fn from_minutes(total: i64) -> Self {
        let total = total.rem_euclid(MINUTES_PER_DAY);
        Self {
            hour: (total / 60) as u32,
            minute: (total % 60) as u32,
            suffix: String::new(),
        }
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Text that followed the clock part in the source string, including
    /// any leading whitespace. Empty when there was none.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Drop the suffix.
    pub fn without_suffix(mut self) -> Self {
        self.suffix.clear();
        self
    }

    /// Minutes since midnight.
    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }

    /// Add a signed number of minutes, wrapping at midnight.
    ///
    /// The suffix is kept. Crossing midnight does not move the time to
    /// another day; the result is simply the wrapped clock reading.
    ///
    /// ```
    /// use prayer_server::domain::TimeOfDay;
    ///
    /// let t = TimeOfDay::new(23, 50).add_minutes(45);
    /// assert_eq!(t.to_string(), "00:35");
    /// ```
    pub fn add_minutes(&self, delta: i64) -> Self {
        let mut shifted = Self::from_minutes(self.minutes_since_midnight() + delta);
        shifted.suffix = self.suffix.clone();
        shifted
    }

    /// Format as `h:MM AM/PM`. Midnight and noon both render as 12.
    pub fn to_12_hour(&self) -> String {
        let period = if self.hour >= 12 { "PM" } else { "AM" };
        let hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{hour}:{:02} {period}", self.minute)
    }

    /// Format as `HH:MM` followed by the original suffix.
    pub fn to_annotated_string(&self) -> String {
        format!("{self}{}", self.suffix)
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        // Components are always in range after normalization.
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Place this clock time on a given date.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.to_naive_time())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Parse an Aladhan timing string.
///
/// A trailing parenthesized annotation (optionally preceded by whitespace)
/// is split off and kept as the suffix. What remains must be exactly
/// `HH:MM`; anything else comes back as [`ParsedTime::Unchanged`].
///
/// ```
/// use prayer_server::domain::{ParsedTime, parse_time};
///
/// assert!(parse_time("13:05").is_parsed());
/// assert_eq!(
///     parse_time("soon"),
///     ParsedTime::Unchanged("soon".to_string())
/// );
/// ```
pub fn parse_time(raw: &str) -> ParsedTime {
    let (clock, suffix) = split_annotation(raw);

    match parse_hhmm(clock) {
        Some((hour, minute)) => ParsedTime::Parsed(TimeOfDay {
            hour,
            minute,
            suffix: suffix.to_string(),
        }),
        None => ParsedTime::Unchanged(raw.to_string()),
    }
}

/// Split `"05:12 (IST)"` into `("05:12", " (IST)")`.
///
/// Only a non-empty parenthesized group at the very end counts as an
/// annotation. Without one the whole string is the clock part.
fn split_annotation(raw: &str) -> (&str, &str) {
    if !raw.ends_with(')') {
        return (raw, "");
    }
    let Some(open) = raw.rfind('(') else {
        return (raw, "");
    };
    // "()" carries nothing
    if open + 2 > raw.len() - 1 {
        return (raw, "");
    }
    let clock = raw[..open].trim_end();
    (clock, &raw[clock.len()..])
}

/// Parse exactly "HH:MM" with in-range values.
fn parse_hhmm(s: &str) -> Option<(u32, u32)> {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let hour = parse_two_digits(&bytes[0..2])?;
    let minute = parse_two_digits(&bytes[3..5])?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// Render a raw timing string in 12-hour form.
///
/// The annotation is dropped. Input that does not parse is returned as-is.
pub fn to_12_hour(raw: &str) -> String {
    match parse_time(raw) {
        ParsedTime::Parsed(t) => t.to_12_hour(),
        ParsedTime::Unchanged(s) => s,
    }
}

/// Shift a raw timing string and render it in 12-hour form.
///
/// The annotation is consumed and not re-attached. Input that does not
/// parse is returned as-is.
pub fn adjust_to_12_hour(raw: &str, offset_minutes: i64) -> String {
    match parse_time(raw) {
        ParsedTime::Parsed(t) => t.add_minutes(offset_minutes).to_12_hour(),
        ParsedTime::Unchanged(s) => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(raw: &str) -> TimeOfDay {
        parse_time(raw).into_time().unwrap()
    }

    #[test]
    fn parse_plain_times() {
        let t = parsed("00:00");
        assert_eq!((t.hour(), t.minute()), (0, 0));
        assert_eq!(t.suffix(), "");

        let t = parsed("23:59");
        assert_eq!((t.hour(), t.minute()), (23, 59));
    }

    #[test]
    fn parse_keeps_annotation() {
        let t = parsed("05:12 (IST)");
        assert_eq!(t.to_string(), "05:12");
        assert_eq!(t.suffix(), " (IST)");
        assert_eq!(t.to_annotated_string(), "05:12 (IST)");

        let t = parsed("05:12(+03)");
        assert_eq!(t.suffix(), "(+03)");
    }

    #[test]
    fn parse_rejects_malformed() {
        for raw in ["", "5:12", "05:1", "0512", "05-12", "ab:cd", "24:00", "12:60", "05:12 IST", "05:12 ()"] {
            assert_eq!(
                parse_time(raw),
                ParsedTime::Unchanged(raw.to_string()),
                "{raw:?} should not parse"
            );
        }
    }

    #[test]
    fn add_minutes_carries_into_hours() {
        assert_eq!(parsed("12:00").add_minutes(48).to_string(), "12:48");
        assert_eq!(parsed("15:30").add_minutes(48).to_string(), "16:18");
        assert_eq!(parsed("10:30").add_minutes(45).to_string(), "11:15");
    }

    #[test]
    fn add_minutes_wraps_without_tracking_the_day() {
        assert_eq!(parsed("23:50").add_minutes(45).to_string(), "00:35");
        assert_eq!(parsed("00:10").add_minutes(-20).to_string(), "23:50");
        assert_eq!(parsed("06:00").add_minutes(24 * 60).to_string(), "06:00");
    }

    #[test]
    fn add_minutes_keeps_suffix() {
        let t = parsed("18:10 (CET)").add_minutes(5);
        assert_eq!(t.to_annotated_string(), "18:15 (CET)");
    }

    #[test]
    fn twelve_hour_format() {
        assert_eq!(to_12_hour("00:00"), "12:00 AM");
        assert_eq!(to_12_hour("12:00"), "12:00 PM");
        assert_eq!(to_12_hour("13:05"), "1:05 PM");
        assert_eq!(to_12_hour("11:59"), "11:59 AM");
        assert_eq!(to_12_hour("23:01 (GMT)"), "11:01 PM");
        assert_eq!(to_12_hour("n/a"), "n/a");
    }

    #[test]
    fn adjust_then_twelve_hour() {
        assert_eq!(adjust_to_12_hour("12:00 (PKT)", 48), "12:48 PM");
        assert_eq!(adjust_to_12_hour("23:30", 45), "12:15 AM");
        assert_eq!(adjust_to_12_hour("--:--", 5), "--:--");
    }

    #[test]
    fn new_normalizes_components() {
        assert_eq!(TimeOfDay::new(25, 61).to_string(), "02:01");
    }

    #[test]
    fn on_date() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let dt = parsed("04:55 (+05)").on(date);
        assert_eq!(dt.to_string(), "2026-02-18 04:55:00");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_time()(hour in 0u32..24, minute in 0u32..60) -> String {
            format!("{:02}:{:02}", hour, minute)
        }
    }

    proptest! {
        /// Parse then display roundtrips
        #[test]
        fn parse_display_roundtrip(time_str in valid_time()) {
            let parsed = parse_time(&time_str).into_time().unwrap();
            prop_assert_eq!(parsed.to_string(), time_str);
        }

        /// Annotations survive a roundtrip untouched
        #[test]
        fn annotation_roundtrip(time_str in valid_time(), zone in "[A-Z+0-9]{1,5}") {
            let raw = format!("{time_str} ({zone})");
            let parsed = parse_time(&raw).into_time().unwrap();
            prop_assert_eq!(parsed.to_annotated_string(), raw);
        }

        /// Arithmetic always lands in range
        #[test]
        fn add_minutes_stays_normalized(time_str in valid_time(), delta in -5000i64..5000) {
            let t = parse_time(&time_str).into_time().unwrap().add_minutes(delta);
            prop_assert!(t.hour() < 24);
            prop_assert!(t.minute() < 60);
        }

        /// Adding then subtracting returns the original clock time
        #[test]
        fn add_sub_identity(time_str in valid_time(), delta in 0i64..3000) {
            let t = parse_time(&time_str).into_time().unwrap();
            prop_assert_eq!(t.add_minutes(delta).add_minutes(-delta), t);
        }

        /// Invalid hour is rejected
        #[test]
        fn invalid_hour_rejected(hour in 24u32..100, minute in 0u32..60) {
            let s = format!("{:02}:{:02}", hour, minute);
            prop_assert!(!parse_time(&s).is_parsed());
        }
    }
}
