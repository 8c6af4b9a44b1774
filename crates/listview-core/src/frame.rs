//! Frame timing for deferred list work.
//!
//! The list never computes all of its rows synchronously. Instead it parks
//! continuations in a [`TimerSet`] and the host runs them from its frame
//! loop. How long a continuation waits is decided by a [`SchedulingTick`],
//! so the same list can be driven by animation frames or by a fixed timer.

use smallvec::SmallVec;
use web_time::{Duration, Instant};

/// Granularity of one "rendering interval".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchedulingTick {
    /// Continuations run on the next frame the host delivers.
    #[default]
    AnimationFrame,
    /// Continuations run on the first frame at least this long after they
    /// were scheduled.
    Interval(Duration),
}

impl SchedulingTick {
    /// When a continuation scheduled at `now` becomes runnable.
    pub fn due_from(self, now: Instant) -> Due {
        match self {
            SchedulingTick::AnimationFrame => Due::NextFrame,
            SchedulingTick::Interval(interval) => Due::At(now + interval),
        }
    }
}

/// Deadline of a pending continuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Due {
    NextFrame,
    At(Instant),
}

impl Due {
    fn is_due(self, now: Instant) -> bool {
        match self {
            Due::NextFrame => true,
            Due::At(deadline) => deadline <= now,
        }
    }
}

/// Handle to a scheduled continuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct PendingTimer<T> {
    id: TimerId,
    due: Due,
    payload: T,
}

/// Continuations owned by one component.
///
/// Dropping the owner, or calling [`cancel_all`](Self::cancel_all), discards
/// every pending continuation; a disposed set refuses new work so nothing can
/// run against a torn-down component.
#[derive(Debug)]
pub struct TimerSet<T> {
    next_id: u64,
    pending: SmallVec<[PendingTimer<T>; 4]>,
    disposed: bool,
}

impl<T> Default for TimerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerSet<T> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: SmallVec::new(),
            disposed: false,
        }
    }

    /// Parks `payload` until `due`. Returns `None` once the set is disposed.
    pub fn schedule(&mut self, due: Due, payload: T) -> Option<TimerId> {
        if self.disposed {
            log::trace!("timer set disposed, continuation dropped");
            return None;
        }
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer { id, due, payload });
        Some(id)
    }

    /// Cancels one continuation. Returns false if it already ran or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.id != id);
        self.pending.len() != before
    }

    /// Cancels everything and disposes the set.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("cancelling {} pending continuation(s)", self.pending.len());
        }
        self.pending.clear();
        self.disposed = true;
    }

    /// Removes and returns the payloads that are runnable at `now`, in the
    /// order they were scheduled.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let mut due = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].due.is_due(now) {
                due.push(self.pending.remove(index).payload);
            } else {
                index += 1;
            }
        }
        due
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|timer| timer.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
