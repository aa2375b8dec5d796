//! A day's raw timing strings, keyed by name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::prayer::Prayer;
use super::time::{ParsedTime, TimeOfDay, parse_time};

/// Timing strings for one day, as returned by Aladhan.
///
/// Keys are not limited to the five prayers: Sunrise, Sunset, Imsak,
/// Midnight and friends are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timings(BTreeMap<String, String>);

impl Timings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parsed clock time for a prayer, if present and well-formed.
    pub fn time_of(&self, prayer: Prayer) -> Option<TimeOfDay> {
        self.get(prayer.key())
            .map(parse_time)
            .and_then(ParsedTime::into_time)
    }

    /// Apply a function to every value, keeping keys.
    pub fn map_values(&self, f: impl Fn(&str, &str) -> String) -> Self {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), f(k.as_str(), v.as_str())))
            .collect()
    }
}

impl FromIterator<(String, String)> for Timings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Timings {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
