//! Fetch and derive the Ramadan month.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::aladhan::{AladhanError, CalculationParams, DayRecord, PrayerTimesSource};
use crate::domain::{AdjustmentMap, Location, adjust_to_12_hour, apply_adjustments};
use crate::error::ScheduleError;

use super::calendar::{CalendarDay, RamadanCalendar};

/// Hijri month number of Ramadan.
pub const RAMADAN_MONTH: u32 = 9;

/// Calculation method used for the calendar when the caller sets none (ISNA).
pub const DEFAULT_CALENDAR_METHOD: u8 = 2;

/// The Hijri year that `today` falls in.
pub async fn resolve_hijri_year<S: PrayerTimesSource>(
    source: &S,
    today: NaiveDate,
) -> Result<i32, ScheduleError> {
    let conversion = source.gregorian_to_hijri(today).await?;
    let year = &conversion.hijri.year;
    year.as_year()
        .ok_or_else(|| AladhanError::InvalidHijriYear(year.raw()).into())
}

/// Fetch Ramadan of the current Hijri year for `location`.
///
/// Every day gets the same adjustments. Any failure aborts the whole
/// load; an empty month is a calendar with no days.
pub async fn load_ramadan<S: PrayerTimesSource>(
    source: &S,
    location: &Location,
    params: CalculationParams,
    adjustments: &AdjustmentMap,
    today: NaiveDate,
) -> Result<RamadanCalendar, ScheduleError> {
    let query = location.resolve()?;
    let params = params.or_method(DEFAULT_CALENDAR_METHOD);

    let hijri_year = resolve_hijri_year(source, today).await?;
    debug!(location = %query, hijri_year, "fetching Ramadan calendar");

    let records = source
        .hijri_calendar(&query, params, hijri_year, RAMADAN_MONTH)
        .await?;
    if records.is_empty() {
        warn!(location = %query, hijri_year, "Ramadan calendar came back empty");
    }

    let days = records
        .iter()
        .map(|record| calendar_day(record, adjustments))
        .collect::<Result<Vec<_>, _>>()?;

    info!(location = %query, hijri_year, days = days.len(), "loaded Ramadan calendar");
    Ok(RamadanCalendar::new(hijri_year, days))
}

/// Adjust one fetched day and render its display timings.
pub fn calendar_day(
    record: &DayRecord,
    adjustments: &AdjustmentMap,
) -> Result<CalendarDay, AladhanError> {
    let gregorian_date = record
        .date
        .gregorian
        .naive_date()
        .map_err(|e| AladhanError::Json {
            message: e.to_string(),
            body: None,
        })?;

    let timings = apply_adjustments(&record.timings, adjustments);
    let display_timings = record
        .timings
        .map_values(|key, raw| adjust_to_12_hour(raw, adjustments.get(key).unwrap_or(0)));

    let hijri = &record.date.hijri;
    Ok(CalendarDay {
        gregorian_date,
        hijri_date: hijri.date.clone(),
        hijri_weekday: hijri.weekday.as_ref().map(|w| w.en.clone()),
        holidays: hijri.holidays.clone(),
        timings,
        display_timings,
    })
}
