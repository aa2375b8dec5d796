//! The five obligatory prayers.

use std::fmt;
use std::str::FromStr;

/// One of the five obligatory daily prayers, in canonical order.
///
/// Sunrise, Sunset, Imsak and Midnight also appear in Aladhan timings but
/// are display-only; they never take part in current/next resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

/// Error returned when a key is not one of the five prayers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not an obligatory prayer: {0}")]
pub struct UnknownPrayer(pub String);

impl Prayer {
    /// Canonical order used for state resolution.
    pub const ALL: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    /// The key Aladhan uses for this prayer.
    pub fn key(&self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Prayer {
    type Err = UnknownPrayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Prayer::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| UnknownPrayer(s.to_string()))
    }
}

/// Keys shown in a daily listing, in display order.
pub const DISPLAY_ORDER: [&str; 7] = [
    "Fajr", "Sunrise", "Dhuhr", "Asr", "Maghrib", "Sunset", "Isha",
];

/// Key for the start of the pre-dawn fast.
pub const IMSAK: &str = "Imsak";
