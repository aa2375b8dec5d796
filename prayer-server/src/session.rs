//! Last-request-wins cancellation for fetch sequences.
//!
//! Each [`LatestOnly`] slot runs at most one future to completion at a
//! time. Starting a new one aborts whatever was in flight, and the
//! aborted run reports [`Outcome::Superseded`] rather than an error.

use std::future::Future;
use std::sync::Mutex;

use futures::future::{AbortHandle, Abortable, Aborted};
use tracing::debug;

/// How a run through a [`LatestOnly`] slot ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    /// A newer run started first. Not a failure; there is nothing to report.
    Superseded,
}

impl<T> Outcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Outcome::Superseded)
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    in_flight: Option<AbortHandle>,
}

/// A single-occupancy slot for cancellable requests.
#[derive(Debug, Default)]
pub struct LatestOnly {
    slot: Mutex<Slot>,
}

impl LatestOnly {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fut`, aborting any run already in flight.
    pub async fn run<F: Future>(&self, fut: F) -> Outcome<F::Output> {
        let (handle, registration) = AbortHandle::new_pair();
        let generation = {
            let mut slot = self.lock();
            if let Some(previous) = slot.in_flight.replace(handle) {
                debug!("superseding in-flight request");
                previous.abort();
            }
            slot.generation += 1;
            slot.generation
        };

        let result = Abortable::new(fut, registration).await;

        {
            let mut slot = self.lock();
            if slot.generation == generation {
                slot.in_flight = None;
            }
        }

        match result {
            Ok(value) => Outcome::Completed(value),
            Err(Aborted) => Outcome::Superseded,
        }
    }

    /// Abort the in-flight run, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.lock().in_flight.take() {
            handle.abort();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
