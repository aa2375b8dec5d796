//! Ramadan calendar: resolve the Hijri year, fetch month 9 and derive
//! sehri/iftar times for every day.

mod calendar;
mod pipeline;

pub use calendar::{CalendarDay, RamadanCalendar, RamadanPhase};
pub use pipeline::{
    DEFAULT_CALENDAR_METHOD, RAMADAN_MONTH, calendar_day, load_ramadan, resolve_hijri_year,
};
