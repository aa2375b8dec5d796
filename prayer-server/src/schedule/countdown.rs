//! Live countdown to the next prayer.
//!
//! [`CountdownScheduler`] is a plain state machine driven by explicit
//! ticks. [`spawn_countdown`] runs one on a one-second tokio interval and
//! publishes what it sees. When the target passes, a single
//! [`RefreshSignal`] tells the owner to reload the schedule.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDateTime};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::domain::Prayer;

use super::clock::Clock;
use super::resolver::{NextPrayer, format_countdown};

/// How often the driver ticks.
pub const TICK_INTERVAL: StdDuration = StdDuration::from_secs(1);

/// What the display shows once the target has passed.
pub const ELAPSED_DISPLAY: &str = "00:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    /// No target, or the target had already passed when it was set.
    Idle,
    /// Counting down to a future target.
    Ticking,
    /// The target passed while ticking. Terminal until retargeted.
    Elapsed,
}

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Remaining {
        prayer: Prayer,
        remaining: Duration,
        text: String,
    },
    Elapsed {
        prayer: Prayer,
        /// True on exactly one tick per target.
        refresh: bool,
    },
}

impl Tick {
    /// Text to show for this tick. Empty when idle.
    pub fn display(&self) -> &str {
        match self {
            Tick::Idle => "",
            Tick::Remaining { text, .. } => text,
            Tick::Elapsed { .. } => ELAPSED_DISPLAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Target {
    prayer: Prayer,
    at: NaiveDateTime,
}

/// Countdown state machine for one target at a time.
#[derive(Debug, Clone)]
pub struct CountdownScheduler {
    target: Option<Target>,
    state: CountdownState,
    refresh_fired: bool,
}

impl CountdownScheduler {
    pub fn new(next: Option<&NextPrayer>, now: NaiveDateTime) -> Self {
        let mut scheduler = Self {
            target: None,
            state: CountdownState::Idle,
            refresh_fired: false,
        };
        scheduler.retarget(next, now);
        scheduler
    }

    /// Point at a new target and re-arm the refresh signal.
    pub fn retarget(&mut self, next: Option<&NextPrayer>, now: NaiveDateTime) {
        self.target = next.map(|n| Target {
            prayer: n.prayer,
            at: n.at,
        });
        self.refresh_fired = false;
        self.state = match self.target {
            Some(t) if t.at > now => CountdownState::Ticking,
            _ => CountdownState::Idle,
        };
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn prayer(&self) -> Option<Prayer> {
        self.target.map(|t| t.prayer)
    }

    /// Advance to `now`.
    pub fn tick(&mut self, now: NaiveDateTime) -> Tick {
        let Some(target) = self.target else {
            return Tick::Idle;
        };

        match self.state {
            CountdownState::Idle => Tick::Idle,
            CountdownState::Elapsed => Tick::Elapsed {
                prayer: target.prayer,
                refresh: false,
            },
            CountdownState::Ticking => {
                let remaining = target.at - now;
                if remaining > Duration::zero() {
                    return Tick::Remaining {
                        prayer: target.prayer,
                        remaining,
                        text: format_countdown(remaining),
                    };
                }

                self.state = CountdownState::Elapsed;
                let refresh = !self.refresh_fired;
                self.refresh_fired = true;
                Tick::Elapsed {
                    prayer: target.prayer,
                    refresh,
                }
            }
        }
    }
}

/// Sent once when a countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSignal {
    pub prayer: Prayer,
}

/// Latest countdown reading published by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownView {
    pub prayer: Option<Prayer>,
    pub state: CountdownState,
    pub display: String,
}

/// Owns a running countdown task. Dropping it stops the task.
#[derive(Debug)]
pub struct CountdownHandle {
    view: watch::Receiver<CountdownView>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Subscribe to countdown readings.
    pub fn subscribe(&self) -> watch::Receiver<CountdownView> {
        self.view.clone()
    }

    /// The most recent reading.
    pub fn current(&self) -> CountdownView {
        self.view.borrow().clone()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start ticking towards `next`.
///
/// To change target, drop the handle and spawn a new one; the new task
/// starts with a fresh one-shot refresh flag.
pub fn spawn_countdown(
    next: Option<NextPrayer>,
    clock: Arc<dyn Clock>,
    refresh: mpsc::UnboundedSender<RefreshSignal>,
) -> CountdownHandle {
    let mut scheduler = CountdownScheduler::new(next.as_ref(), clock.now());
    let (view_tx, view_rx) = watch::channel(CountdownView {
        prayer: scheduler.prayer(),
        state: scheduler.state(),
        display: String::new(),
    });

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let tick = scheduler.tick(clock.now());

            view_tx.send_replace(CountdownView {
                prayer: scheduler.prayer(),
                state: scheduler.state(),
                display: tick.display().to_string(),
            });

            if let Tick::Elapsed {
                prayer,
                refresh: true,
            } = tick
            {
                info!(%prayer, "prayer time reached, requesting schedule refresh");
                if refresh.send(RefreshSignal { prayer }).is_err() {
                    debug!("refresh receiver gone, stopping countdown");
                    break;
                }
            }
        }
    });

    CountdownHandle {
        view: view_rx,
        task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::clock::TokioClock;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn next_at(at: NaiveDateTime, now: NaiveDateTime) -> NextPrayer {
        NextPrayer {
            prayer: Prayer::Asr,
            time: at.format("%H:%M").to_string(),
            at,
            countdown: at - now,
            countdown_text: format_countdown(at - now),
        }
    }

    #[test]
    fn ticks_down_then_fires_once() {
        let now = at(15, 29, 58);
        let next = next_at(at(15, 30, 0), now);
        let mut scheduler = CountdownScheduler::new(Some(&next), now);
        assert_eq!(scheduler.state(), CountdownState::Ticking);

        let tick = scheduler.tick(at(15, 29, 59));
        assert_eq!(tick.display(), "00:01");

        let tick = scheduler.tick(at(15, 30, 0));
        assert_eq!(
            tick,
            Tick::Elapsed {
                prayer: Prayer::Asr,
                refresh: true
            }
        );
        assert_eq!(tick.display(), ELAPSED_DISPLAY);
        assert_eq!(scheduler.state(), CountdownState::Elapsed);

        for s in 1..5 {
            let tick = scheduler.tick(at(15, 30, s));
            assert_eq!(
                tick,
                Tick::Elapsed {
                    prayer: Prayer::Asr,
                    refresh: false
                }
            );
        }
    }

    #[test]
    fn hour_long_countdown_format() {
        let now = at(13, 0, 0);
        let next = next_at(at(15, 30, 0), now);
        let mut scheduler = CountdownScheduler::new(Some(&next), now);
        assert_eq!(scheduler.tick(now).display(), "02:30:00");
    }

    #[test]
    fn no_target_is_idle() {
        let mut scheduler = CountdownScheduler::new(None, at(20, 0, 0));
        assert_eq!(scheduler.state(), CountdownState::Idle);
        assert_eq!(scheduler.tick(at(20, 0, 1)), Tick::Idle);
    }

    #[test]
    fn past_target_is_idle_and_never_fires() {
        let now = at(16, 0, 0);
        let next = next_at(at(15, 30, 0), at(15, 0, 0));
        let mut scheduler = CountdownScheduler::new(Some(&next), now);
        assert_eq!(scheduler.state(), CountdownState::Idle);
        assert_eq!(scheduler.tick(now), Tick::Idle);
    }

    #[test]
    fn retarget_rearms_refresh() {
        let now = at(15, 29, 59);
        let mut scheduler = CountdownScheduler::new(Some(&next_at(at(15, 30, 0), now)), now);
        assert!(matches!(
            scheduler.tick(at(15, 30, 0)),
            Tick::Elapsed { refresh: true, .. }
        ));

        let now = at(15, 30, 1);
        let maghrib = NextPrayer {
            prayer: Prayer::Maghrib,
            ..next_at(at(15, 30, 3), now)
        };
        scheduler.retarget(Some(&maghrib), now);
        assert_eq!(scheduler.state(), CountdownState::Ticking);
        assert_eq!(
            scheduler.tick(at(15, 30, 3)),
            Tick::Elapsed {
                prayer: Prayer::Maghrib,
                refresh: true
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn driver_sends_exactly_one_refresh() {
        let start = at(15, 29, 57);
        let clock = Arc::new(TokioClock::starting_at(start));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = spawn_countdown(Some(next_at(at(15, 30, 0), start)), clock, tx);

        let signal = rx.recv().await.unwrap();
        assert_eq!(signal.prayer, Prayer::Asr);
        assert_eq!(handle.current().display, ELAPSED_DISPLAY);
        assert_eq!(handle.current().state, CountdownState::Elapsed);

        // Plenty more ticks, no second signal
        tokio::time::sleep(StdDuration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn driver_publishes_remaining_time() {
        let start = at(11, 0, 0);
        let clock = Arc::new(TokioClock::starting_at(start));
        let (tx, _rx) = mpsc::unbounded_channel();

        let handle = spawn_countdown(Some(next_at(at(12, 0, 0), start)), clock, tx);
        let mut view = handle.subscribe();

        view.changed().await.unwrap();
        assert_eq!(view.borrow().display, "01:00:00");

        tokio::time::sleep(StdDuration::from_millis(1500)).await;
        assert_eq!(handle.current().display, "59:59");
        assert_eq!(handle.current().prayer, Some(Prayer::Asr));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_task() {
        let start = at(15, 29, 58);
        let clock = Arc::new(TokioClock::starting_at(start));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = spawn_countdown(Some(next_at(at(15, 30, 0), start)), clock, tx);
        drop(handle);

        // Sender lived in the aborted task, so the channel closes unsignalled
        assert!(rx.recv().await.is_none());
    }
}
