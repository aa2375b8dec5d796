//! Domain types for prayer schedules.
//!
//! This module holds the pure building blocks: time-of-day parsing,
//! the adjustment engine, the five prayers and caller locations. Nothing
//! here performs IO.

mod adjust;
mod error;
mod location;
mod prayer;
mod time;
mod timings;

pub use adjust::{AdjustmentMap, AdjustmentProfile, apply_adjustments};
pub use error::DomainError;
pub use location::{Location, LocationError, LocationQuery, nearby_mosques_url};
pub use prayer::{DISPLAY_ORDER, IMSAK, Prayer, UnknownPrayer};
pub use time::{ParsedTime, TimeOfDay, adjust_to_12_hour, parse_time, to_12_hour};
pub use timings::Timings;
