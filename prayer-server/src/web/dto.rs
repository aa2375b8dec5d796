//! Data transfer objects for web requests and responses.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::aladhan::CalculationParams;
use crate::domain::{Location, Timings};
use crate::ramadan::{CalendarDay, RamadanCalendar};
use crate::schedule::{DailySchedule, NextPrayer};

/// Query string shared by the schedule endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,

    /// Aladhan calculation method id
    pub method: Option<u8>,

    /// Asr school: 0 Shafi, 1 Hanafi
    pub school: Option<u8>,

    /// Adjustment profile name (extended, standard, none)
    pub profile: Option<String>,

    /// Date in YYYY-MM-DD format (defaults to today)
    pub date: Option<String>,
}

impl ScheduleQuery {
    pub fn location(&self) -> Location {
        Location {
            city: self.city.clone(),
            region: self.region.clone(),
            country: self.country.clone(),
            lat: self.lat,
            lon: self.lon,
        }
    }

    /// Request parameters, falling back to `defaults` field by field.
    pub fn params(&self, defaults: CalculationParams) -> CalculationParams {
        CalculationParams::new(
            self.method.or(defaults.method),
            self.school.or(defaults.school),
        )
    }
}

/// Query for the nearby mosques link.
#[derive(Debug, Deserialize)]
pub struct MosquesQuery {
    pub lat: f64,
    pub lon: f64,
}

/// One row of the display list.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DisplayRow {
    pub name: &'static str,
    pub time: String,
}

/// The upcoming prayer.
#[derive(Debug, Serialize)]
pub struct NextPrayerResult {
    pub name: String,

    /// Adjusted timing as listed in the schedule
    pub time: String,

    /// Seconds until it starts
    pub countdown_secs: i64,

    /// Milliseconds until it starts
    pub countdown_ms: i64,

    /// `MM:SS` or `HH:MM:SS`
    pub countdown: String,
}

impl NextPrayerResult {
    pub fn from_next(next: &NextPrayer) -> Self {
        Self {
            name: next.prayer.to_string(),
            time: next.time.clone(),
            countdown_secs: next.countdown.num_seconds(),
            countdown_ms: next.countdown.num_milliseconds(),
            countdown: next.countdown_text.clone(),
        }
    }
}

/// Response for daily timings.
#[derive(Debug, Serialize)]
pub struct TimingsResponse {
    /// YYYY-MM-DD
    pub date: String,

    /// Readable date, or the timezone when the service gave none
    pub label: Option<String>,

    pub hijri_date: Option<String>,

    pub timezone: Option<String>,

    /// Adjusted timings, 24-hour
    pub timings: Timings,

    /// 12-hour display rows in display order
    pub display: Vec<DisplayRow>,

    pub current: Option<String>,

    pub next: Option<NextPrayerResult>,
}

impl TimingsResponse {
    pub fn from_schedule(schedule: &DailySchedule) -> Self {
        Self {
            date: format_date(schedule.date),
            label: schedule.label.clone(),
            hijri_date: schedule.hijri_date.clone(),
            timezone: schedule.timezone.clone(),
            timings: schedule.timings.clone(),
            display: schedule
                .display()
                .into_iter()
                .map(|(name, time)| DisplayRow { name, time })
                .collect(),
            current: schedule.state.current.map(|p| p.to_string()),
            next: schedule.state.next.as_ref().map(NextPrayerResult::from_next),
        }
    }
}

/// One day of Ramadan.
#[derive(Debug, Serialize)]
pub struct CalendarDayResult {
    /// YYYY-MM-DD
    pub gregorian_date: String,

    /// DD-MM-YYYY
    pub hijri_date: String,

    pub hijri_weekday: Option<String>,

    pub holidays: Vec<String>,

    /// End of sehri (Imsak, or Fajr)
    pub sehri: Option<String>,

    /// Iftar (Maghrib)
    pub iftar: Option<String>,

    /// Adjusted timings, 12-hour
    pub timings: Timings,
}

impl CalendarDayResult {
    pub fn from_day(day: &CalendarDay) -> Self {
        Self {
            gregorian_date: format_date(day.gregorian_date),
            hijri_date: day.hijri_date.clone(),
            hijri_weekday: day.hijri_weekday.clone(),
            holidays: day.holidays.clone(),
            sehri: day.sehri().map(str::to_string),
            iftar: day.iftar().map(str::to_string),
            timings: day.display_timings.clone(),
        }
    }
}

/// Response for the Ramadan calendar.
#[derive(Debug, Serialize)]
pub struct RamadanResponse {
    pub hijri_year: i32,

    /// When the first fast begins, YYYY-MM-DDTHH:MM
    pub fast_start: Option<String>,

    /// before, during, after or unknown
    pub phase: &'static str,

    /// Time left until the first fast, while it is still ahead
    pub countdown: Option<String>,

    pub days: Vec<CalendarDayResult>,
}

impl RamadanResponse {
    pub fn from_calendar(calendar: &RamadanCalendar, now: NaiveDateTime) -> Self {
        Self {
            hijri_year: calendar.hijri_year,
            fast_start: calendar.fast_start().map(format_date_time),
            phase: calendar.phase(now).as_str(),
            countdown: calendar.countdown_to_start(now),
            days: calendar.days().iter().map(CalendarDayResult::from_day).collect(),
        }
    }
}

/// Response for the nearby mosques link.
#[derive(Debug, Serialize)]
pub struct MosquesResponse {
    pub url: String,
}

/// Response after moving the home monitor.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    /// The lookup the monitor will use
    pub location: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Parse a YYYY-MM-DD query date.
pub fn parse_query_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_date_time(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AdjustmentMap;

    #[test]
    fn query_params_fall_back_per_field() {
        let query = ScheduleQuery {
            school: Some(1),
            ..Default::default()
        };
        assert_eq!(
            query.params(CalculationParams::new(Some(2), Some(0))),
            CalculationParams::new(Some(2), Some(1))
        );
    }

    #[test]
    fn query_location() {
        let query = ScheduleQuery {
            city: Some("Lahore".into()),
            country: Some("Pakistan".into()),
            ..Default::default()
        };
        assert_eq!(
            query.location(),
            Location::city("Lahore", Some("Pakistan".into()))
        );
    }

    #[test]
    fn query_dates() {
        assert_eq!(parse_query_date("2026-02-18"), NaiveDate::from_ymd_opt(2026, 2, 18));
        assert_eq!(parse_query_date("18-02-2026"), None);
    }

    #[test]
    fn timings_response_shape() {
        let timings: Timings = [
            ("Fajr", "05:00"),
            ("Sunrise", "06:20"),
            ("Dhuhr", "12:00"),
            ("Asr", "15:30"),
            ("Maghrib", "18:10"),
            ("Isha", "19:30"),
        ]
        .into_iter()
        .collect();
        let date = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let now = date.and_hms_opt(13, 0, 0).unwrap();
        let schedule = DailySchedule::new(date, timings, &AdjustmentMap::new(), now);

        let response = TimingsResponse::from_schedule(&schedule);
        assert_eq!(response.date, "2026-02-18");
        assert_eq!(response.current.as_deref(), Some("Dhuhr"));
        let next = response.next.unwrap();
        assert_eq!(next.name, "Asr");
        assert_eq!(next.countdown_secs, 9000);
        assert_eq!(next.countdown_ms, 9_000_000);
        assert_eq!(next.countdown, "02:30:00");
        assert_eq!(
            response.display[1],
            DisplayRow {
                name: "Sunrise",
                time: "6:20 AM".into()
            }
        );

        let json = serde_json::to_value(TimingsResponse::from_schedule(&schedule)).unwrap();
        assert_eq!(json["timings"]["Asr"], "15:30");

        // Sub-second remainders survive in the millisecond field
        let now = date.and_hms_milli_opt(13, 0, 0, 250).unwrap();
        let schedule =
            DailySchedule::new(date, schedule.raw_timings.clone(), &AdjustmentMap::new(), now);
        let next = TimingsResponse::from_schedule(&schedule).next.unwrap();
        assert_eq!(next.countdown_ms, 8_999_750);
        assert_eq!(next.countdown_secs, 8999);
    }
}
