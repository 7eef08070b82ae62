//! Virtual-clock timer storage.

use std::time::Duration;

/// Handle identifying a single armed timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Firing behaviour of an armed timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Fires every `interval` until cancelled.
    Repeating {
        /// Time between consecutive firings.
        interval: Duration,
    },
    /// Fires once and then disarms itself.
    OneShot,
}

#[derive(Clone, Copy, Debug)]
struct ArmedTimer {
    id: TimerId,
    deadline: Duration,
    kind: TimerKind,
}

/// Deterministic timer set driven by an explicit virtual clock.
///
/// Timers fire one at a time in deadline order; ties resolve in arming order.
/// Callers interleave their own reactions between firings, so a reaction that
/// cancels or arms timers is visible to every later firing.
#[derive(Clone, Debug, Default)]
pub struct TimerWheel {
    now: Duration,
    next_id: u64,
    timers: Vec<ArmedTimer>,
}

impl TimerWheel {
    /// Creates an empty wheel with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Arms a timer that first fires one `interval` from now.
    ///
    /// A zero interval is rounded up to one nanosecond so the clock always
    /// moves forward between firings.
    pub fn arm_repeating(&mut self, interval: Duration) -> TimerId {
        let interval = interval.max(Duration::from_nanos(1));
        self.arm(interval, TimerKind::Repeating { interval })
    }

    /// Arms a timer that fires once, `delay` from now.
    pub fn arm_once(&mut self, delay: Duration) -> TimerId {
        self.arm(delay, TimerKind::OneShot)
    }

    /// Disarms the timer. Returns `false` when it was no longer live.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    /// Number of armed timers matching the predicate.
    #[must_use]
    pub fn live_count<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(TimerKind) -> bool,
    {
        self.timers
            .iter()
            .filter(|timer| predicate(timer.kind))
            .count()
    }

    /// Deadline of the timer, if it is still armed.
    #[must_use]
    pub fn deadline(&self, id: TimerId) -> Option<Duration> {
        self.timers
            .iter()
            .find(|timer| timer.id == id)
            .map(|timer| timer.deadline)
    }

    /// Fires the earliest timer due at or before `horizon`.
    ///
    /// The clock jumps to that timer's deadline. Repeating timers are re-armed
    /// one interval later; one-shot timers are removed.
    pub fn fire_next(&mut self, horizon: Duration) -> Option<TimerId> {
        let position = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.deadline <= horizon)
            .min_by_key(|(_, timer)| (timer.deadline, timer.id))
            .map(|(position, _)| position)?;

        let timer = self.timers[position];
        self.now = self.now.max(timer.deadline);
        match timer.kind {
            TimerKind::Repeating { interval } => {
                self.timers[position].deadline = timer.deadline.saturating_add(interval);
            }
            TimerKind::OneShot => {
                let _ = self.timers.swap_remove(position);
            }
        }
        Some(timer.id)
    }

    /// Moves the clock forward to `horizon` once every due timer has fired.
    pub fn settle(&mut self, horizon: Duration) {
        self.now = self.now.max(horizon);
    }

    fn arm(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.timers.push(ArmedTimer {
            id,
            deadline: self.now.saturating_add(delay),
            kind,
        });
        id
    }
}
