//! The fetch seam between the pipelines and the network.

use std::future::Future;

use chrono::NaiveDate;

use crate::domain::LocationQuery;

use super::error::AladhanError;
use super::types::{DateConversion, DayRecord};

/// Aladhan calculation parameters.
///
/// `None` leaves the choice to the service default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CalculationParams {
    /// Calculation method id (e.g. 2 for ISNA, 1 for Karachi).
    pub method: Option<u8>,
    /// Asr juristic school: 0 for Shafi, 1 for Hanafi.
    pub school: Option<u8>,
}

impl CalculationParams {
    pub fn new(method: Option<u8>, school: Option<u8>) -> Self {
        Self { method, school }
    }

    /// Use `method` when no method is set.
    pub fn or_method(mut self, method: u8) -> Self {
        self.method.get_or_insert(method);
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(method) = self.method {
            pairs.push(("method", method.to_string()));
        }
        if let Some(school) = self.school {
            pairs.push(("school", school.to_string()));
        }
        pairs
    }
}

/// Anything that can answer the three Aladhan queries this crate needs.
///
/// Implemented by the live client, the caching wrapper and the in-memory
/// mock, so the pipelines can be exercised without the network.
pub trait PrayerTimesSource: Send + Sync {
    /// Timings for one day.
    fn daily_timings(
        &self,
        query: &LocationQuery,
        params: CalculationParams,
        date: NaiveDate,
    ) -> impl Future<Output = Result<DayRecord, AladhanError>> + Send;

    /// Convert a Gregorian date to its Hijri equivalent.
    fn gregorian_to_hijri(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<DateConversion, AladhanError>> + Send;

    /// Every day of one Hijri month, in ascending order.
    fn hijri_calendar(
        &self,
        query: &LocationQuery,
        params: CalculationParams,
        year: i32,
        month: u32,
    ) -> impl Future<Output = Result<Vec<DayRecord>, AladhanError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_skip_unset() {
        assert!(CalculationParams::default().query_pairs().is_empty());
        assert_eq!(
            CalculationParams::new(Some(2), Some(1)).query_pairs(),
            vec![("method", "2".to_string()), ("school", "1".to_string())]
        );
    }

    #[test]
    fn or_method_keeps_explicit_choice() {
        assert_eq!(CalculationParams::default().or_method(2).method, Some(2));
        assert_eq!(
            CalculationParams::new(Some(1), None).or_method(2).method,
            Some(1)
        );
    }
}
