//! Single-slot event debouncing.
//!
//! Collapses a burst of filesystem events into one, keeping only the most
//! recent event. Each new event pushes the deadline out by the full window.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::ChangeEvent;

/// Event waiting for its deadline.
struct PendingEvent {
    event: ChangeEvent,
    deadline: Instant,
}

/// Thread-safe single-slot debouncer.
pub(crate) struct EventDebouncer {
    pending: Mutex<Option<PendingEvent>>,
    window: Duration,
}

impl EventDebouncer {
    /// Create a debouncer with the given window.
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            pending: Mutex::new(None),
            window,
        }
    }

    /// Record an event, replacing any pending one and restarting the window.
    pub(crate) fn record(&self, event: ChangeEvent) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending = Some(PendingEvent {
            event,
            deadline: Instant::now() + self.window,
        });
    }

    /// Take the pending event if its deadline has passed.
    pub(crate) fn drain_ready(&self) -> Option<ChangeEvent> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.as_ref()?.deadline > Instant::now() {
            return None;
        }
        pending.take().map(|p| p.event)
    }
}
