//! Per-prayer minute offsets.
//!
//! Local practice often shifts some prayers later than the astronomical
//! time the service computes. The engine here is key-driven: it applies
//! whatever offsets it is given to whatever keys are present, without
//! knowing which keys are prayers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;
use super::time::{ParsedTime, parse_time};
use super::timings::Timings;

/// Minute offsets keyed by timing name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjustmentMap(BTreeMap<String, i64>);

impl AdjustmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, minutes: i64) -> Self {
        self.0.insert(key.into(), minutes);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, minutes: i64) {
        self.0.insert(key.into(), minutes);
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.0.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merged(mut self, other: &AdjustmentMap) -> Self {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), *v);
        }
        self
    }

    /// Parse `"Dhuhr=48,Asr=48,Maghrib=5"`.
    ///
    /// ```
    /// use prayer_server::domain::AdjustmentMap;
    ///
    /// let map = AdjustmentMap::parse_list("Dhuhr=48, Maghrib=-2").unwrap();
    /// assert_eq!(map.get("Dhuhr"), Some(48));
    /// assert_eq!(map.get("Maghrib"), Some(-2));
    /// ```
    pub fn parse_list(s: &str) -> Result<Self, DomainError> {
        let mut map = Self::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, minutes) = entry
                .split_once('=')
                .ok_or_else(|| DomainError::InvalidAdjustment(entry.to_string()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(DomainError::InvalidAdjustment(entry.to_string()));
            }
            let minutes = minutes
                .trim()
                .parse::<i64>()
                .map_err(|_| DomainError::InvalidAdjustment(entry.to_string()))?;
            map.set(key, minutes);
        }
        Ok(map)
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for AdjustmentMap {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Named sets of offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdjustmentProfile {
    /// Dhuhr and Asr +48, Maghrib +5.
    #[default]
    Extended,
    /// Dhuhr and Asr +45, Maghrib +5.
    Standard,
    /// No offsets.
    None,
}

impl AdjustmentProfile {
    pub fn adjustments(&self) -> AdjustmentMap {
        let midday = match self {
            AdjustmentProfile::Extended => 48,
            AdjustmentProfile::Standard => 45,
            AdjustmentProfile::None => return AdjustmentMap::new(),
        };
        AdjustmentMap::new()
            .with("Dhuhr", midday)
            .with("Asr", midday)
            .with("Maghrib", 5)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentProfile::Extended => "extended",
            AdjustmentProfile::Standard => "standard",
            AdjustmentProfile::None => "none",
        }
    }
}

impl fmt::Display for AdjustmentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentProfile {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "extended" => Ok(AdjustmentProfile::Extended),
            "standard" => Ok(AdjustmentProfile::Standard),
            "none" => Ok(AdjustmentProfile::None),
            other => Err(DomainError::UnknownProfile(other.to_string())),
        }
    }
}

/// Shift every timing that has an offset.
///
/// The clock part moves; any annotation such as " (IST)" is re-attached
/// unchanged. Values without an offset, and values that do not parse,
/// pass through verbatim.
///
/// ```
/// use prayer_server::domain::{AdjustmentMap, Timings, apply_adjustments};
///
/// let timings: Timings = [("Dhuhr", "12:00 (IST)"), ("Sunrise", "06:10 (IST)")]
///     .into_iter()
///     .collect();
/// let adjusted = apply_adjustments(&timings, &AdjustmentMap::new().with("Dhuhr", 48));
///
/// assert_eq!(adjusted.get("Dhuhr"), Some("12:48 (IST)"));
/// assert_eq!(adjusted.get("Sunrise"), Some("06:10 (IST)"));
/// ```
pub fn apply_adjustments(timings: &Timings, adjustments: &AdjustmentMap) -> Timings {
    timings.map_values(|key, raw| match adjustments.get(key) {
        Some(offset) => match parse_time(raw) {
            ParsedTime::Parsed(t) => t.add_minutes(offset).to_annotated_string(),
            ParsedTime::Unchanged(s) => s,
        },
        None => raw.to_string(),
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Keys without an offset are never modified
        #[test]
        fn unadjusted_keys_untouched(
            values in prop::collection::btree_map("[A-Z][a-z]{2,8}", "[0-9: ()A-Z]{0,12}", 0..8)
        ) {
            let t: Timings = values.into_iter().collect();
            let adjusted = apply_adjustments(&t, &AdjustmentMap::new());
            prop_assert_eq!(adjusted, t);
        }

        /// Adjusting preserves the key set
        #[test]
        fn key_set_preserved(
            hour in 0u32..24, minute in 0u32..60, offset in -120i64..120
        ) {
            let raw = format!("{hour:02}:{minute:02} (UTC)");
            let t: Timings = [("Asr", raw.as_str()), ("Sunset", "18:00")].into_iter().collect();
            let adjusted = apply_adjustments(&t, &AdjustmentMap::new().with("Asr", offset));
            prop_assert_eq!(adjusted.len(), 2);
            prop_assert!(adjusted.get("Asr").unwrap().ends_with(" (UTC)"));
        }
    }
}
