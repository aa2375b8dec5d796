//! Injectable time sources.
//!
//! Everything that needs "now" takes a [`Clock`] rather than calling
//! `Local::now()` itself, so tests can pin or advance time.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDateTime};

/// A source of the current local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The system's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, to: NaiveDateTime) {
        *self.lock() = to;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.lock();
        *now += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NaiveDateTime> {
        // A poisoned clock still holds a valid time
        self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.lock()
    }
}

/// A clock anchored at a fixed wall time that advances with tokio's timer.
///
/// Under `tokio::time::pause()` this moves exactly as far as the paused
/// runtime auto-advances, which keeps timer-driven tests deterministic.
#[derive(Debug, Clone)]
pub struct TokioClock {
    anchor: NaiveDateTime,
    started: tokio::time::Instant,
}

impl TokioClock {
    pub fn starting_at(anchor: NaiveDateTime) -> Self {
        Self {
            anchor,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> NaiveDateTime {
        let elapsed = self.started.elapsed();
        let elapsed = Duration::from_std(elapsed).unwrap_or(Duration::zero());
        self.anchor + elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn manual_clock_moves_on_demand() {
        let clock = ManualClock::new(at(12, 0, 0));
        assert_eq!(clock.now(), at(12, 0, 0));

        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), at(12, 1, 30));

        clock.set(at(4, 0, 0));
        assert_eq!(clock.now(), at(4, 0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_follows_paused_time() {
        let clock = TokioClock::starting_at(at(12, 0, 0));
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        assert_eq!(clock.now(), at(12, 0, 5));
    }
}
