//! Daily prayer state: which prayer is current, which is next, and a
//! live countdown to it.

mod clock;
mod countdown;
mod daily;
mod resolver;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use countdown::{
    CountdownHandle, CountdownScheduler, CountdownState, CountdownView, ELAPSED_DISPLAY,
    RefreshSignal, TICK_INTERVAL, Tick, spawn_countdown,
};
pub use daily::{DailySchedule, load_daily};
pub use resolver::{NextPrayer, ResolvedPrayerState, find_current, find_next, format_countdown, resolve};
