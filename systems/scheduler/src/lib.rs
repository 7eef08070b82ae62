#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Time-driven target lifecycle for Goblin Hunt.
//!
//! The scheduler owns two timers on a virtual clock: a repeating spawn timer
//! whose ticks age out or place targets, and a one-shot safety timeout that
//! cancels the spawn timer after a long fixed duration. Nothing outside this
//! crate ever holds a timer handle; callers interact through
//! [`SpawnScheduler::start`], [`SpawnScheduler::stop`] and
//! [`SpawnScheduler::restart`], and drain firings with
//! [`SpawnScheduler::poll`].

mod wheel;

use std::time::Duration;

use goblin_hunt_core::{SAFETY_TIMEOUT, TICK_INTERVAL};
use thiserror::Error;
use tracing::{debug, warn};

pub use wheel::{TimerId, TimerKind, TimerWheel};

/// Timing parameters required to construct the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    tick_interval: Duration,
    safety_timeout: Duration,
}

impl Config {
    /// Creates a configuration with explicit timings.
    ///
    /// The safety timeout must cover at least one tick interval, otherwise no
    /// target could ever be placed.
    pub fn new(tick_interval: Duration, safety_timeout: Duration) -> Result<Self, ConfigError> {
        if tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if safety_timeout < tick_interval {
            return Err(ConfigError::SafetyTimeoutTooShort {
                tick_interval,
                safety_timeout,
            });
        }
        Ok(Self {
            tick_interval,
            safety_timeout,
        })
    }

    /// Interval between spawn ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Delay before the safety timeout cancels the spawn timer.
    #[must_use]
    pub const fn safety_timeout(&self) -> Duration {
        self.safety_timeout
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval: TICK_INTERVAL,
            safety_timeout: SAFETY_TIMEOUT,
        }
    }
}

/// Rejected scheduler timings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The spawn timer would fire continuously.
    #[error("tick interval must be positive")]
    ZeroTickInterval,
    /// The safety timeout would fire before the first tick.
    #[error(
        "safety timeout of {}ms is shorter than the {}ms tick interval",
        safety_timeout.as_millis(),
        tick_interval.as_millis()
    )]
    SafetyTimeoutTooShort {
        /// Requested tick interval.
        tick_interval: Duration,
        /// Requested safety timeout.
        safety_timeout: Duration,
    },
}

/// Timer firing reported to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The repeating spawn timer fired.
    Tick,
    /// The safety timeout fired; the spawn timer has already been cancelled.
    SafetyTimeout,
}

/// Owner of the spawn timer and the safety timeout.
#[derive(Debug)]
pub struct SpawnScheduler {
    config: Config,
    wheel: TimerWheel,
    spawn_timer: Option<TimerId>,
    safety_timer: Option<TimerId>,
}

impl SpawnScheduler {
    /// Creates an idle scheduler with its clock at zero.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            wheel: TimerWheel::new(),
            spawn_timer: None,
            safety_timer: None,
        }
    }

    /// Arms the spawn timer and the safety timeout.
    ///
    /// Any live timers are cancelled first, so starting a running scheduler
    /// behaves exactly like [`SpawnScheduler::restart`].
    pub fn start(&mut self) {
        self.restart();
    }

    /// Cancels any live timers and arms a fresh spawn timer and safety timeout.
    pub fn restart(&mut self) {
        self.stop();
        self.cancel_safety_timeout();

        let spawn = self.wheel.arm_repeating(self.config.tick_interval);
        let safety = self.wheel.arm_once(self.config.safety_timeout);
        self.spawn_timer = Some(spawn);
        self.safety_timer = Some(safety);
        debug!(
            now_ms = self.now().as_millis() as u64,
            spawn_timer = spawn.get(),
            safety_timer = safety.get(),
            "spawn scheduler armed"
        );
    }

    /// Cancels the spawn timer, leaving the safety timeout untouched.
    pub fn stop(&mut self) {
        if let Some(id) = self.spawn_timer.take() {
            let _ = self.wheel.cancel(id);
            debug!(spawn_timer = id.get(), "spawn timer cancelled");
        }
    }

    /// Cancels both the spawn timer and the safety timeout.
    pub fn stop_all(&mut self) {
        self.stop();
        self.cancel_safety_timeout();
    }

    /// Fires the next timer due at or before `horizon`.
    ///
    /// Returns `None` once nothing else is due. The caller reacts to each
    /// signal before polling again, so timers armed or cancelled by a reaction
    /// take effect for the remainder of the window.
    pub fn poll(&mut self, horizon: Duration) -> Option<Signal> {
        loop {
            let fired = self.wheel.fire_next(horizon)?;
            if self.spawn_timer == Some(fired) {
                return Some(Signal::Tick);
            }
            if self.safety_timer == Some(fired) {
                self.safety_timer = None;
                self.stop();
                warn!(
                    now_ms = self.now().as_millis() as u64,
                    "safety timeout elapsed; spawn timer cancelled"
                );
                return Some(Signal::SafetyTimeout);
            }
            // Stale firing from a replaced timer.
            let _ = self.wheel.cancel(fired);
        }
    }

    /// Moves the clock to `horizon` after [`SpawnScheduler::poll`] is exhausted.
    pub fn settle(&mut self, horizon: Duration) {
        self.wheel.settle(horizon);
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.wheel.now()
    }

    /// Timing parameters in use.
    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Reports whether the spawn timer is armed.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.spawn_timer.is_some()
    }

    /// Virtual time at which the spawn timer fires next.
    #[must_use]
    pub fn next_tick_at(&self) -> Option<Duration> {
        self.spawn_timer.and_then(|id| self.wheel.deadline(id))
    }

    /// Virtual time at which the safety timeout fires.
    #[must_use]
    pub fn safety_deadline(&self) -> Option<Duration> {
        self.safety_timer.and_then(|id| self.wheel.deadline(id))
    }

    /// Number of repeating timers currently armed.
    #[must_use]
    pub fn live_spawn_timers(&self) -> usize {
        self.wheel
            .live_count(|kind| matches!(kind, TimerKind::Repeating { .. }))
    }

    /// Number of safety timeouts currently armed.
    #[must_use]
    pub fn live_safety_timeouts(&self) -> usize {
        self.wheel
            .live_count(|kind| matches!(kind, TimerKind::OneShot))
    }

    fn cancel_safety_timeout(&mut self) {
        if let Some(id) = self.safety_timer.take() {
            let _ = self.wheel.cancel(id);
        }
    }
}
