//! The fetched Ramadan month as an ordered, queryable sequence of days.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::{IMSAK, Prayer, Timings, parse_time};

/// One day of Ramadan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub gregorian_date: NaiveDate,
    /// Hijri date as `DD-MM-YYYY`.
    pub hijri_date: String,
    pub hijri_weekday: Option<String>,
    pub holidays: Vec<String>,
    /// Adjusted timings, 24-hour with annotations.
    pub timings: Timings,
    /// Adjusted timings in 12-hour form, annotations dropped.
    pub display_timings: Timings,
}

impl CalendarDay {
    /// End of sehri: Imsak when listed, otherwise Fajr. 12-hour form.
    pub fn sehri(&self) -> Option<&str> {
        self.display_timings
            .get(IMSAK)
            .filter(|s| !s.is_empty())
            .or_else(|| self.display_timings.get(Prayer::Fajr.key()))
    }

    /// Iftar, at Maghrib. 12-hour form.
    pub fn iftar(&self) -> Option<&str> {
        self.display_timings.get(Prayer::Maghrib.key())
    }

    /// When the fast begins on this day, if the timing parses.
    pub fn fast_begins(&self) -> Option<NaiveDateTime> {
        let raw = self
            .timings
            .get(IMSAK)
            .filter(|s| !s.is_empty())
            .or_else(|| self.timings.get(Prayer::Fajr.key()))?;
        parse_time(raw).into_time().map(|t| t.on(self.gregorian_date))
    }
}

/// Where a moment falls relative to the fetched month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RamadanPhase {
    /// No days, or the first day's start time did not parse.
    Unknown,
    /// Before the first fast begins.
    Before,
    /// From the first fast until the end of the last day.
    During,
    /// After the last day.
    After,
}

impl RamadanPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RamadanPhase::Unknown => "unknown",
            RamadanPhase::Before => "before",
            RamadanPhase::During => "during",
            RamadanPhase::After => "after",
        }
    }
}

/// A Ramadan month, ordered by ascending Gregorian date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamadanCalendar {
    pub hijri_year: i32,
    days: Vec<CalendarDay>,
    fast_start: Option<NaiveDateTime>,
}

impl RamadanCalendar {
    /// Build a calendar; days are sorted by Gregorian date.
    pub fn new(hijri_year: i32, mut days: Vec<CalendarDay>) -> Self {
        days.sort_by_key(|d| d.gregorian_date);
        let fast_start = days.first().and_then(CalendarDay::fast_begins);
        Self {
            hijri_year,
            days,
            fast_start,
        }
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// When the first fast begins: day one's Imsak (or Fajr).
    pub fn fast_start(&self) -> Option<NaiveDateTime> {
        self.fast_start
    }

    /// The day with this exact Gregorian date.
    pub fn day_for(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days
            .binary_search_by_key(&date, |d| d.gregorian_date)
            .ok()
            .map(|i| &self.days[i])
    }

    pub fn phase(&self, now: NaiveDateTime) -> RamadanPhase {
        let (Some(start), Some(last)) = (self.fast_start, self.days.last()) else {
            return RamadanPhase::Unknown;
        };
        if now < start {
            RamadanPhase::Before
        } else if now.date() <= last.gregorian_date {
            RamadanPhase::During
        } else {
            RamadanPhase::After
        }
    }

    /// Time left until the first fast, as `"{d} days {h}h {m}m {s}s"`.
    ///
    /// `None` once the fast has started, or when there is no start.
    pub fn countdown_to_start(&self, now: NaiveDateTime) -> Option<String> {
        let remaining = self.fast_start? - now;
        (remaining > Duration::zero()).then(|| format_long_countdown(remaining))
    }
}

fn format_long_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{days} days {hours}h {minutes}m {seconds}s")
}
