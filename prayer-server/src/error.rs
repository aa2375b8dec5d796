//! Errors surfaced by the schedule pipelines.
//!
//! A pipeline run fails with exactly one of these. Malformed timing
//! strings never get here, and neither does a superseded request; see
//! [`crate::session::Outcome`].

use crate::aladhan::AladhanError;
use crate::domain::LocationError;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The caller's input was unusable; nothing was fetched
    #[error("{0}")]
    Configuration(#[from] LocationError),

    /// The prayer times service failed or answered with nonsense
    #[error("failed to load timings: {0}")]
    Service(#[from] AladhanError),
}

impl ScheduleError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, ScheduleError::Configuration(_))
    }
}
