//! Caching layer for Aladhan responses.
//!
//! Prayer times for a given place and day never change, so responses can
//! be cached generously. The TTL only bounds staleness after upstream
//! corrections. Failed requests are never cached.

use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::aladhan::{
    AladhanError, CalculationParams, DateConversion, DayRecord, PrayerTimesSource,
};
use crate::domain::LocationQuery;

/// Cache key for daily timings: (location key, params, date).
type DayKey = (String, CalculationParams, NaiveDate);

/// Cache key for calendars: (location key, params, Hijri year, Hijri month).
type CalendarKey = (String, CalculationParams, i32, u32);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per kind.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Any [`PrayerTimesSource`] with caching.
pub struct CachedAladhanClient<S> {
    source: S,
    days: MokaCache<DayKey, DayRecord>,
    conversions: MokaCache<NaiveDate, DateConversion>,
    calendars: MokaCache<CalendarKey, Vec<DayRecord>>,
}

impl<S: PrayerTimesSource> CachedAladhanClient<S> {
    /// Create a new cached client.
    pub fn new(source: S, config: &CacheConfig) -> Self {
        Self {
            source,
            days: build_cache(config),
            conversions: build_cache(config),
            calendars: build_cache(config),
        }
    }

    /// Access the underlying source for operations that bypass cache.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Total cached entries across all kinds.
    pub fn cache_entry_count(&self) -> u64 {
        self.days.entry_count() + self.conversions.entry_count() + self.calendars.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.days.invalidate_all();
        self.conversions.invalidate_all();
        self.calendars.invalidate_all();
    }
}

fn build_cache<K, V>(config: &CacheConfig) -> MokaCache<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    MokaCache::builder()
        .time_to_live(config.ttl)
        .max_capacity(config.max_capacity)
        .build()
}

impl<S: PrayerTimesSource> PrayerTimesSource for CachedAladhanClient<S> {
    async fn daily_timings(
        &self,
        query: &LocationQuery,
        params: CalculationParams,
        date: NaiveDate,
    ) -> Result<DayRecord, AladhanError> {
        let key = (query.cache_key(), params, date);

        // Try cache first
        if let Some(cached) = self.days.get(&key).await {
            debug!(location = %query, %date, "daily timings cache hit");
            return Ok(cached);
        }

        let day = self.source.daily_timings(query, params, date).await?;
        self.days.insert(key, day.clone()).await;
        Ok(day)
    }

    async fn gregorian_to_hijri(&self, date: NaiveDate) -> Result<DateConversion, AladhanError> {
        if let Some(cached) = self.conversions.get(&date).await {
            return Ok(cached);
        }

        let conversion = self.source.gregorian_to_hijri(date).await?;
        self.conversions.insert(date, conversion.clone()).await;
        Ok(conversion)
    }

    async fn hijri_calendar(
        &self,
        query: &LocationQuery,
        params: CalculationParams,
        year: i32,
        month: u32,
    ) -> Result<Vec<DayRecord>, AladhanError> {
        let key = (query.cache_key(), params, year, month);

        if let Some(cached) = self.calendars.get(&key).await {
            debug!(location = %query, year, month, "calendar cache hit");
            return Ok(cached);
        }

        let days = self
            .source
            .hijri_calendar(query, params, year, month)
            .await?;
        self.calendars.insert(key, days.clone()).await;
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aladhan::MockAladhanClient;
    use crate::aladhan::fixtures::day_json;

    fn query() -> LocationQuery {
        LocationQuery::CityCountry {
            city: "Lahore".into(),
            country: "Pakistan".into(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 18).unwrap()
    }

    fn day() -> DayRecord {
        serde_json::from_str(&day_json("18-02-2026", "01-09-1447", "05:25", None)).unwrap()
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 1000);
    }

    #[tokio::test]
    async fn second_request_served_from_cache() {
        let mock = MockAladhanClient::new();
        mock.set_day(&query(), day()).await;
        let cached = CachedAladhanClient::new(mock.clone(), &CacheConfig::default());

        let params = CalculationParams::default();
        cached.daily_timings(&query(), params, date()).await.unwrap();
        cached.daily_timings(&query(), params, date()).await.unwrap();
        assert_eq!(mock.call_count(), 1);

        // Different params are a different entry
        cached
            .daily_timings(&query(), CalculationParams::new(Some(1), None), date())
            .await
            .unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let mock = MockAladhanClient::new();
        let cached = CachedAladhanClient::new(mock.clone(), &CacheConfig::default());
        let params = CalculationParams::default();

        assert!(cached.daily_timings(&query(), params, date()).await.is_err());

        mock.set_day(&query(), day()).await;
        assert!(cached.daily_timings(&query(), params, date()).await.is_ok());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let mock = MockAladhanClient::new();
        mock.set_calendar(1447, 9, vec![day()]).await;
        let cached = CachedAladhanClient::new(mock.clone(), &CacheConfig::default());
        let params = CalculationParams::default();

        cached.hijri_calendar(&query(), params, 1447, 9).await.unwrap();
        cached.invalidate_cache();
        cached.hijri_calendar(&query(), params, 1447, 9).await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }
}
