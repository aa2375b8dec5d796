//! Aladhan prayer times API client.
//!
//! This module provides an HTTP client for the public Aladhan API
//! (<https://aladhan.com/prayer-times-api>), which computes daily prayer
//! times and Hijri calendars for a location.
//!
//! Key characteristics of Aladhan:
//! - Every response is wrapped in `{ code, status, data }`; a non-200
//!   `code` is an error even when the HTTP status is 200
//! - Times are "HH:MM" strings in the location's local time, usually
//!   followed by a timezone annotation like " (PKT)"
//! - Dates in paths and payloads use `DD-MM-YYYY`

mod client;
mod error;
mod mock;
mod source;
mod types;

pub use client::{AladhanClient, AladhanConfig, DEFAULT_BASE_URL};
pub use error::AladhanError;
pub use mock::MockAladhanClient;
pub use source::{CalculationParams, PrayerTimesSource};
pub use types::{
    DateConversion, DateInfo, DayRecord, GregorianDate, HijriDate, HijriMonth, Meta, Weekday,
    YearField, format_dmy, parse_dmy,
};

#[cfg(test)]
pub(crate) use types::fixtures;
