//! Aladhan HTTP client.
//!
//! Provides async methods for querying the Aladhan prayer times API.
//! Handles request limiting, status mapping and envelope decoding.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::LocationQuery;

use super::error::AladhanError;
use super::source::{CalculationParams, PrayerTimesSource};
use super::types::{DateConversion, DayRecord, decode_envelope, format_dmy};

/// Default base URL for the Aladhan API.
pub const DEFAULT_BASE_URL: &str = "https://api.aladhan.com/v1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the Aladhan client.
#[derive(Debug, Clone)]
pub struct AladhanConfig {
    /// Base URL for the API (defaults to production Aladhan)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AladhanConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for AladhanConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Aladhan API client.
///
/// Uses a semaphore to limit concurrent requests to the public API.
#[derive(Debug, Clone)]
pub struct AladhanClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl AladhanClient {
    /// Create a new Aladhan client with the given configuration.
    pub fn new(config: AladhanConfig) -> Result<Self, AladhanError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("prayer-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// GET `path` with query parameters and decode the envelope's data.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, AladhanError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| AladhanError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "Aladhan request");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AladhanError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        decode_envelope(&body)
    }
}

/// Endpoint suffix and query parameters for a location.
fn location_route(query: &LocationQuery) -> (&'static str, Vec<(&'static str, String)>) {
    match query {
        LocationQuery::Coordinates { lat, lon } => (
            "",
            vec![("latitude", lat.to_string()), ("longitude", lon.to_string())],
        ),
        LocationQuery::CityCountry { city, country } => (
            "ByCity",
            vec![("city", city.clone()), ("country", country.clone())],
        ),
        LocationQuery::Address(address) => ("ByAddress", vec![("address", address.clone())]),
    }
}

/// Path and query for `/timings`, `/timingsByCity` or `/timingsByAddress`.
fn daily_request(
    query: &LocationQuery,
    params: CalculationParams,
    date: NaiveDate,
) -> (String, Vec<(&'static str, String)>) {
    let (suffix, mut pairs) = location_route(query);
    pairs.extend(params.query_pairs());
    (format!("/timings{suffix}/{}", format_dmy(date)), pairs)
}

/// Path and query for `/hijriCalendar` and its variants.
fn calendar_request(
    query: &LocationQuery,
    params: CalculationParams,
    year: i32,
    month: u32,
) -> (String, Vec<(&'static str, String)>) {
    let (suffix, mut pairs) = location_route(query);
    pairs.extend(params.query_pairs());
    (format!("/hijriCalendar{suffix}/{year}/{month}"), pairs)
}

impl PrayerTimesSource for AladhanClient {
    async fn daily_timings(
        &self,
        query: &LocationQuery,
        params: CalculationParams,
        date: NaiveDate,
    ) -> Result<DayRecord, AladhanError> {
        let (path, pairs) = daily_request(query, params, date);
        self.get(&path, &pairs).await
    }

    async fn gregorian_to_hijri(&self, date: NaiveDate) -> Result<DateConversion, AladhanError> {
        self.get(&format!("/gToH/{}", format_dmy(date)), &[]).await
    }

    async fn hijri_calendar(
        &self,
        query: &LocationQuery,
        params: CalculationParams,
        year: i32,
        month: u32,
    ) -> Result<Vec<DayRecord>, AladhanError> {
        let (path, pairs) = calendar_request(query, params, year, month);
        self.get(&path, &pairs).await
    }
}
