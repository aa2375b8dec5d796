//! Aladhan API response DTOs.
//!
//! These types map directly to the Aladhan v1 JSON responses. Only the
//! fields this crate reads are modelled; serde ignores the rest. Fields
//! the API sometimes omits are `Option`.

use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{DomainError, Timings};

use super::error::AladhanError;

/// Every Aladhan response is wrapped in `{ code, status, data }`.
///
/// On failure `data` is usually a plain message string, so it is kept
/// as raw JSON until `code` has been checked.
#[derive(Debug, Deserialize)]
struct Envelope {
    code: u16,
    status: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// One day of timings, as returned by `/timings` and inside calendar arrays.
#[derive(Debug, Clone, Deserialize)]
pub struct DayRecord {
    /// Timing strings, e.g. `"Fajr": "05:12 (PKT)"`.
    pub timings: Timings,

    /// Gregorian and Hijri dates for this day.
    pub date: DateInfo,

    /// Calculation metadata.
    pub meta: Option<Meta>,
}

/// The `date` block of a day record.
#[derive(Debug, Clone, Deserialize)]
pub struct DateInfo {
    /// Human-readable date, e.g. "18 Feb 2026".
    pub readable: Option<String>,

    /// Unix timestamp as a string.
    pub timestamp: Option<String>,

    pub gregorian: GregorianDate,

    pub hijri: HijriDate,
}

/// Gregorian side of a date block.
#[derive(Debug, Clone, Deserialize)]
pub struct GregorianDate {
    /// Date in `DD-MM-YYYY` format.
    pub date: String,

    pub weekday: Option<Weekday>,
}

/// Hijri side of a date block.
#[derive(Debug, Clone, Deserialize)]
pub struct HijriDate {
    /// Date in `DD-MM-YYYY` format.
    pub date: String,

    /// Year. Aladhan sends a string, but numbers are tolerated.
    pub year: YearField,

    pub month: Option<HijriMonth>,

    pub weekday: Option<Weekday>,

    /// Named observances falling on this day.
    #[serde(default)]
    pub holidays: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Weekday {
    pub en: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HijriMonth {
    pub number: u32,
    pub en: String,
}

/// A year that may arrive as `"1447"` or `1447`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum YearField {
    Number(i64),
    Text(String),
}

impl YearField {
    /// The year as a number, if it is one.
    pub fn as_year(&self) -> Option<i32> {
        match self {
            YearField::Number(n) => i32::try_from(*n).ok(),
            YearField::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn raw(&self) -> String {
        match self {
            YearField::Number(n) => n.to_string(),
            YearField::Text(s) => s.clone(),
        }
    }
}

/// The `meta` block of a day record.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Response from `/gToH/{date}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DateConversion {
    pub gregorian: GregorianDate,
    pub hijri: HijriDate,
}

impl GregorianDate {
    /// Parse the `DD-MM-YYYY` date.
    pub fn naive_date(&self) -> Result<NaiveDate, DomainError> {
        parse_dmy(&self.date)
    }
}

impl DayRecord {
    /// Label for the day: the readable date, else the timezone.
    pub fn label(&self) -> Option<String> {
        self.date.readable.clone().or_else(|| {
            self.meta
                .as_ref()
                .and_then(|m| m.timezone.as_ref())
                .map(|tz| format!("Timezone: {tz}"))
        })
    }
}

/// Parse a `DD-MM-YYYY` date string.
pub fn parse_dmy(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), "%d-%m-%Y")
        .map_err(|_| DomainError::InvalidDate(s.to_string()))
}

/// Format a date the way Aladhan paths expect it.
pub fn format_dmy(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Decode an Aladhan envelope and extract its `data`.
pub(crate) fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, AladhanError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| AladhanError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })?;

    if envelope.code != 200 {
        let detail = match &envelope.data {
            serde_json::Value::String(s) => s.clone(),
            _ => envelope.status.clone(),
        };
        return Err(AladhanError::Upstream {
            code: envelope.code,
            status: detail,
        });
    }

    serde_json::from_value(envelope.data).map_err(|e| AladhanError::Json {
        message: e.to_string(),
        body: None,
    })
}
