//! Virtual-clock timer queue backing `set_timeout` on the document.
//!
//! Time only moves when the host calls [`Document::advance`](super::Document::advance),
//! which keeps deferred widget behaviour deterministic.

use std::fmt;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle for a pending timer.
    pub struct TimerId;
}

struct Timer {
    deadline: Duration,
    /// Tie-breaker so timers with equal deadlines fire in scheduling order.
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

pub(crate) struct TimerQueue {
    now: Duration,
    seq: u64,
    timers: SlotMap<TimerId, Timer>,
}

impl TimerQueue {
    pub(crate) fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            timers: SlotMap::with_key(),
        }
    }

    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn pending(&self) -> usize {
        self.timers.len()
    }

    pub(crate) fn schedule(&mut self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        self.seq += 1;
        self.timers.insert(Timer {
            deadline: self.now + delay,
            seq: self.seq,
            callback,
        })
    }

    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Remove the earliest timer due at or before `until` and move the clock
    /// to its deadline.
    pub(crate) fn pop_due(&mut self, until: Duration) -> Option<Box<dyn FnOnce()>> {
        let id = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= until)
            .min_by_key(|(_, timer)| (timer.deadline, timer.seq))
            .map(|(id, _)| id)?;
        let timer = self.timers.remove(id)?;
        self.now = self.now.max(timer.deadline);
        Some(timer.callback)
    }

    pub(crate) fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now", &self.now)
            .field("pending", &self.timers.len())
            .finish()
    }
}
