//! Current and next prayer resolution.
//!
//! Both functions are pure in `(timings, now)`. Each prayer's clock time
//! is placed on `now`'s date; there is no look-ahead into tomorrow.

use chrono::{Duration, NaiveDateTime};

use crate::domain::{Prayer, Timings};

/// The upcoming prayer and how long until it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextPrayer {
    pub prayer: Prayer,
    /// The timing string as it appears in the schedule.
    pub time: String,
    /// When it starts, on today's date.
    pub at: NaiveDateTime,
    /// Always strictly positive.
    pub countdown: Duration,
    pub countdown_text: String,
}

/// Where in the day `now` falls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedPrayerState {
    pub current: Option<Prayer>,
    pub next: Option<NextPrayer>,
}

/// Resolve both the current and the next prayer.
pub fn resolve(timings: &Timings, now: NaiveDateTime) -> ResolvedPrayerState {
    ResolvedPrayerState {
        current: find_current(timings, now),
        next: find_next(timings, now),
    }
}

/// The prayer whose window `now` falls in.
///
/// That is the latest prayer that has already started today. Before
/// Fajr nothing has started yet, and the previous night's final prayer
/// is still in effect, so the last listed prayer (normally Isha) is
/// returned. `None` only when none of the five prayers are listed.
pub fn find_current(timings: &Timings, now: NaiveDateTime) -> Option<Prayer> {
    let listed: Vec<Prayer> = Prayer::ALL
        .into_iter()
        .filter(|p| timings.get(p.key()).is_some())
        .collect();

    let last_passed = listed.iter().rev().copied().find(|p| {
        timings
            .time_of(*p)
            .is_some_and(|t| t.on(now.date()) <= now)
    });

    last_passed.or_else(|| listed.last().copied())
}

/// The nearest prayer still to come today.
///
/// Returns `None` once every prayer has passed; the caller is expected to
/// fetch the next day's schedule at that point.
pub fn find_next(timings: &Timings, now: NaiveDateTime) -> Option<NextPrayer> {
    Prayer::ALL
        .into_iter()
        .filter_map(|prayer| {
            let at = timings.time_of(prayer)?.on(now.date());
            let countdown = at - now;
            (countdown > Duration::zero()).then_some((prayer, at, countdown))
        })
        .min_by_key(|(_, _, countdown)| *countdown)
        .map(|(prayer, at, countdown)| NextPrayer {
            prayer,
            time: timings.get(prayer.key()).unwrap_or_default().to_string(),
            at,
            countdown,
            countdown_text: format_countdown(countdown),
        })
}

/// Format a remaining duration as `MM:SS`, or `HH:MM:SS` from one hour up.
///
/// Sub-second remainders are truncated; negative durations render as zero.
///
/// ```
/// use chrono::Duration;
/// use prayer_server::schedule::format_countdown;
///
/// assert_eq!(format_countdown(Duration::seconds(95)), "01:35");
/// assert_eq!(format_countdown(Duration::minutes(150)), "02:30:00");
/// ```
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn day() -> Timings {
        [
            ("Fajr", "05:00"),
            ("Sunrise", "06:20"),
            ("Dhuhr", "12:00"),
            ("Asr", "15:30"),
            ("Maghrib", "18:10"),
            ("Isha", "19:30"),
            ("Midnight", "00:05"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn afternoon() {
        let state = resolve(&day(), at(13, 0));
        assert_eq!(state.current, Some(Prayer::Dhuhr));

        let next = state.next.unwrap();
        assert_eq!(next.prayer, Prayer::Asr);
        assert_eq!(next.time, "15:30");
        assert_eq!(next.at, at(15, 30));
        assert_eq!(next.countdown, Duration::minutes(150));
        assert_eq!(next.countdown_text, "02:30:00");
    }

    #[test]
    fn before_fajr_isha_is_current() {
        let state = resolve(&day(), at(4, 0));
        assert_eq!(state.current, Some(Prayer::Isha));
        assert_eq!(state.next.unwrap().prayer, Prayer::Fajr);
    }

    #[test]
    fn after_isha_nothing_is_next() {
        let state = resolve(&day(), at(20, 0));
        assert_eq!(state.current, Some(Prayer::Isha));
        assert!(state.next.is_none());
    }

    #[test]
    fn exactly_at_start_counts_as_current_not_next() {
        let state = resolve(&day(), at(12, 0));
        assert_eq!(state.current, Some(Prayer::Dhuhr));
        assert_eq!(state.next.unwrap().prayer, Prayer::Asr);
    }

    #[test]
    fn display_only_keys_are_ignored() {
        // Sunrise at 06:20 must not become "next" at 06:00
        let next = find_next(&day(), at(6, 0)).unwrap();
        assert_eq!(next.prayer, Prayer::Dhuhr);
    }

    #[test]
    fn no_canonical_keys() {
        let timings: Timings = [("Sunrise", "06:20")].into_iter().collect();
        assert_eq!(find_current(&timings, at(12, 0)), None);
        assert_eq!(find_next(&timings, at(12, 0)), None);
    }

    #[test]
    fn partial_schedule_falls_back_to_last_listed() {
        let timings: Timings = [("Fajr", "05:00"), ("Maghrib", "18:10")].into_iter().collect();
        assert_eq!(find_current(&timings, at(4, 0)), Some(Prayer::Maghrib));
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let mut timings = day();
        timings.insert("Asr", "tbd");
        let state = resolve(&timings, at(13, 0));
        assert_eq!(state.current, Some(Prayer::Dhuhr));
        assert_eq!(state.next.unwrap().prayer, Prayer::Maghrib);
    }

    #[test]
    fn annotated_times_resolve() {
        let timings: Timings = [("Fajr", "05:00 (BST)"), ("Dhuhr", "12:00 (BST)")]
            .into_iter()
            .collect();
        let next = find_next(&timings, at(11, 59)).unwrap();
        assert_eq!(next.time, "12:00 (BST)");
        assert_eq!(next.countdown_text, "01:00");
    }

    #[test]
    fn countdown_truncates_seconds() {
        let now = at(11, 0) + Duration::milliseconds(500);
        let timings: Timings = [("Dhuhr", "12:00")].into_iter().collect();
        let next = find_next(&timings, now).unwrap();
        assert_eq!(next.countdown_text, "59:59");
    }

    #[test]
    fn format_countdown_shapes() {
        assert_eq!(format_countdown(Duration::zero()), "00:00");
        assert_eq!(format_countdown(Duration::seconds(59)), "00:59");
        assert_eq!(format_countdown(Duration::seconds(3599)), "59:59");
        assert_eq!(format_countdown(Duration::seconds(3600)), "01:00:00");
        assert_eq!(format_countdown(Duration::hours(12) + Duration::seconds(1)), "12:00:01");
        assert_eq!(format_countdown(Duration::seconds(-5)), "00:00");
    }
}
