//! Today's schedule: fetch, adjust, resolve.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::aladhan::{CalculationParams, PrayerTimesSource};
use crate::domain::{AdjustmentMap, DISPLAY_ORDER, Location, Timings, apply_adjustments, to_12_hour};
use crate::error::ScheduleError;

use super::resolver::{ResolvedPrayerState, resolve};

/// One day's adjusted timings and where `now` sits within them.
#[derive(Debug, Clone)]
pub struct DailySchedule {
    pub date: NaiveDate,
    /// Readable date from the service, or the timezone when absent.
    pub label: Option<String>,
    pub hijri_date: Option<String>,
    pub timezone: Option<String>,
    /// Timings exactly as fetched.
    pub raw_timings: Timings,
    /// Timings after adjustments, still in 24-hour form.
    pub timings: Timings,
    pub state: ResolvedPrayerState,
}

impl DailySchedule {
    /// Build from fetched timings.
    pub fn new(
        date: NaiveDate,
        raw_timings: Timings,
        adjustments: &AdjustmentMap,
        now: NaiveDateTime,
    ) -> Self {
        let timings = apply_adjustments(&raw_timings, adjustments);
        let state = resolve(&timings, now);
        Self {
            date,
            label: None,
            hijri_date: None,
            timezone: None,
            raw_timings,
            timings,
            state,
        }
    }

    /// Re-resolve against a later instant without refetching.
    pub fn resolve_at(&self, now: NaiveDateTime) -> ResolvedPrayerState {
        resolve(&self.timings, now)
    }

    /// Display rows in display order, 12-hour formatted. Keys missing
    /// from the schedule are left out.
    pub fn display(&self) -> Vec<(&'static str, String)> {
        DISPLAY_ORDER
            .iter()
            .filter_map(|key| self.timings.get(key).map(|raw| (*key, to_12_hour(raw))))
            .collect()
    }
}

/// Fetch today's timings for `location` and resolve them at `now`.
///
/// The location is validated before anything is fetched.
pub async fn load_daily<S: PrayerTimesSource>(
    source: &S,
    location: &Location,
    params: CalculationParams,
    adjustments: &AdjustmentMap,
    now: NaiveDateTime,
) -> Result<DailySchedule, ScheduleError> {
    let query = location.resolve()?;
    let date = now.date();

    debug!(location = %query, %date, "loading daily timings");
    let day = source.daily_timings(&query, params, date).await?;

    let mut schedule = DailySchedule::new(date, day.timings.clone(), adjustments, now);
    schedule.label = day.label();
    schedule.hijri_date = Some(day.date.hijri.date.clone());
    schedule.timezone = day.meta.as_ref().and_then(|m| m.timezone.clone());
    Ok(schedule)
}
