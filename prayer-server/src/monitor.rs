//! Background prayer monitor for the configured home location.
//!
//! Loads today's schedule, logs where we are in it, and counts down to
//! the next prayer. When the countdown fires the schedule is reloaded.
//! After Isha there is nothing to count down to, so the monitor sleeps
//! until just past midnight and starts on the new day.
//!
//! The home location arrives on a `watch` channel. A change while a load
//! is in flight supersedes that load; a change while waiting reloads
//! straight away.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::aladhan::{CalculationParams, PrayerTimesSource};
use crate::domain::{AdjustmentMap, Location};
use crate::schedule::{Clock, DailySchedule, RefreshSignal, load_daily, spawn_countdown};
use crate::session::{LatestOnly, Outcome};

/// Wait before retrying a failed load.
pub const RETRY_DELAY: Duration = Duration::from_secs(60);

/// Slack added after midnight so the new day has definitely begun.
const MIDNIGHT_GRACE: Duration = Duration::from_secs(1);

/// Keeps the home location's schedule loaded and counted down.
pub struct Monitor<S> {
    source: Arc<S>,
    home: watch::Receiver<Location>,
    params: CalculationParams,
    adjustments: AdjustmentMap,
    clock: Arc<dyn Clock>,
    session: LatestOnly,
}

enum Loaded {
    Schedule(DailySchedule),
    Superseded,
    Failed,
}

impl<S: PrayerTimesSource + 'static> Monitor<S> {
    pub fn new(
        source: Arc<S>,
        home: watch::Receiver<Location>,
        params: CalculationParams,
        adjustments: AdjustmentMap,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            home,
            params,
            adjustments,
            clock,
            session: LatestOnly::new(),
        }
    }

    /// Run forever.
    pub async fn run(mut self) {
        let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel::<RefreshSignal>();

        loop {
            let schedule = match self.load().await {
                Loaded::Schedule(schedule) => schedule,
                Loaded::Superseded => continue,
                Loaded::Failed => {
                    self.wait(RETRY_DELAY).await;
                    continue;
                }
            };

            // The fetch may have outlasted the prayer it was counting to
            let now = self.clock.now();
            let state = schedule.resolve_at(now);
            let midnight = until_after_midnight(now);

            let Some(next) = state.next else {
                info!(
                    wait_secs = midnight.as_secs(),
                    "no prayers left today, waiting for midnight"
                );
                self.wait(midnight).await;
                continue;
            };

            while refresh_rx.try_recv().is_ok() {}
            let _countdown = spawn_countdown(Some(next), self.clock.clone(), refresh_tx.clone());

            tokio::select! {
                Some(signal) = refresh_rx.recv() => {
                    info!(prayer = %signal.prayer, "reloading schedule");
                }
                () = tokio::time::sleep(midnight) => {
                    info!("new day, reloading schedule");
                }
                Ok(()) = self.home.changed() => {
                    info!("home location changed, reloading schedule");
                }
            }
        }
    }

    /// One load through the session, for the latest home location.
    async fn load(&mut self) -> Loaded {
        let location = self.home.borrow_and_update().clone();
        let now = self.clock.now();
        let load = self.session.run(load_daily(
            self.source.as_ref(),
            &location,
            self.params,
            &self.adjustments,
            now,
        ));
        tokio::pin!(load);

        let outcome = tokio::select! {
            outcome = &mut load => outcome,
            Ok(()) = self.home.changed() => {
                self.session.cancel();
                load.await
            }
        };

        match outcome {
            Outcome::Superseded => {
                debug!("home location changed mid-load, starting over");
                Loaded::Superseded
            }
            Outcome::Completed(Ok(schedule)) => {
                log_schedule(&schedule);
                Loaded::Schedule(schedule)
            }
            Outcome::Completed(Err(e)) => {
                warn!(
                    error = %e,
                    retry_secs = RETRY_DELAY.as_secs(),
                    "failed to load home schedule"
                );
                Loaded::Failed
            }
        }
    }

    /// Sleep for `wait`, or until the home location changes.
    async fn wait(&mut self, wait: Duration) {
        tokio::select! {
            () = tokio::time::sleep(wait) => {}
            Ok(()) = self.home.changed() => {
                info!("home location changed, reloading schedule");
            }
        }
    }
}

fn log_schedule(schedule: &DailySchedule) {
    let current = schedule.state.current.map(|p| p.to_string());
    match &schedule.state.next {
        Some(next) => info!(
            date = %schedule.date,
            current = current.as_deref().unwrap_or("-"),
            next = %next.prayer,
            at = %next.time,
            remaining = %next.countdown_text,
            "home schedule loaded"
        ),
        None => info!(
            date = %schedule.date,
            current = current.as_deref().unwrap_or("-"),
            "home schedule loaded, no prayers remaining"
        ),
    }
}

/// Time from `now` until just after the following midnight.
pub fn until_after_midnight(now: NaiveDateTime) -> Duration {
    let midnight = now
        .date()
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0));
    let remaining = midnight
        .and_then(|m| (m - now).to_std().ok())
        .unwrap_or(Duration::ZERO);
    remaining + MIDNIGHT_GRACE
}
