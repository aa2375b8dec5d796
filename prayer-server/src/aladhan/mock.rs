//! Mock Aladhan client for testing without network access.
//!
//! Serves canned responses from memory and can be told to fail or to
//! stall, which is how the cancellation paths get exercised.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::domain::LocationQuery;

use super::error::AladhanError;
use super::source::{CalculationParams, PrayerTimesSource};
use super::types::{DateConversion, DayRecord};

#[derive(Default)]
struct MockData {
    /// Daily records keyed by location cache key.
    days: HashMap<String, DayRecord>,
    conversion: Option<DateConversion>,
    /// Calendars keyed by (year, month).
    calendars: HashMap<(i32, u32), Vec<DayRecord>>,
    failure: Option<String>,
    delay: Option<Duration>,
}

/// Mock Aladhan client that serves data from memory.
#[derive(Clone, Default)]
pub struct MockAladhanClient {
    data: Arc<RwLock<MockData>>,
    calls: Arc<AtomicUsize>,
}

impl MockAladhanClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `day` for daily requests at `query`, whatever the date.
    pub async fn set_day(&self, query: &LocationQuery, day: DayRecord) {
        self.data.write().await.days.insert(query.cache_key(), day);
    }

    /// Serve `conversion` for every Gregorian-to-Hijri request.
    pub async fn set_conversion(&self, conversion: DateConversion) {
        self.data.write().await.conversion = Some(conversion);
    }

    /// Serve `days` for the given Hijri month.
    pub async fn set_calendar(&self, year: i32, month: u32, days: Vec<DayRecord>) {
        self.data.write().await.calendars.insert((year, month), days);
    }

    /// Make every request fail with a 503 carrying `message`.
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.data.write().await.failure = Some(message.into());
    }

    /// Sleep before answering each request.
    pub async fn set_delay(&self, delay: Duration) {
        self.data.write().await.delay = Some(delay);
    }

    /// Number of requests served so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Common preamble: count, stall, and maybe fail.
    async fn begin(&self) -> Result<(), AladhanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, failure) = {
            let data = self.data.read().await;
            (data.delay, data.failure.clone())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(message) => Err(AladhanError::Api {
                status: 503,
                message,
            }),
            None => Ok(()),
        }
    }
}

impl PrayerTimesSource for MockAladhanClient {
    async fn daily_timings(
        &self,
        query: &LocationQuery,
        _params: CalculationParams,
        _date: NaiveDate,
    ) -> Result<DayRecord, AladhanError> {
        self.begin().await?;
        let data = self.data.read().await;
        data.days
            .get(&query.cache_key())
            .cloned()
            .ok_or_else(|| AladhanError::Upstream {
                code: 404,
                status: format!("No mock timings for {query}"),
            })
    }

    async fn gregorian_to_hijri(&self, _date: NaiveDate) -> Result<DateConversion, AladhanError> {
        self.begin().await?;
        let data = self.data.read().await;
        data.conversion.clone().ok_or_else(|| AladhanError::Upstream {
            code: 404,
            status: "No mock date conversion".to_string(),
        })
    }

    async fn hijri_calendar(
        &self,
        _query: &LocationQuery,
        _params: CalculationParams,
        year: i32,
        month: u32,
    ) -> Result<Vec<DayRecord>, AladhanError> {
        self.begin().await?;
        let data = self.data.read().await;
        // An unknown month is an empty calendar, not an error
        Ok(data
            .calendars
            .get(&(year, month))
            .cloned()
            .unwrap_or_default())
    }
}
