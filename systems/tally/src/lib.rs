#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hit and miss counters that decide when a session concludes.

use goblin_hunt_core::{HIT_GOAL, MISS_LIMIT};

/// Counter pair tracking claimed targets and misses since the last reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitTally {
    hits: u32,
    misses: u32,
}

impl HitTally {
    /// Creates a tally with both counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { hits: 0, misses: 0 }
    }

    /// Records a claimed target.
    pub fn increment_hit(&mut self) {
        self.hits = self.hits.saturating_add(1);
    }

    /// Records a failed click or an expired target.
    pub fn increment_miss(&mut self) {
        self.misses = self.misses.saturating_add(1);
    }

    /// Number of claimed targets.
    #[must_use]
    pub const fn hits(&self) -> u32 {
        self.hits
    }

    /// Number of misses.
    #[must_use]
    pub const fn misses(&self) -> u32 {
        self.misses
    }

    /// Reports whether the hit goal has been reached.
    #[must_use]
    pub const fn has_won(&self) -> bool {
        self.hits >= HIT_GOAL
    }

    /// Reports whether the miss limit has been reached.
    #[must_use]
    pub const fn has_lost(&self) -> bool {
        self.misses >= MISS_LIMIT
    }

    /// Zeroes both counters.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let tally = HitTally::new();
        assert_eq!((tally.hits(), tally.misses()), (0, 0));
        assert!(!tally.has_won());
        assert!(!tally.has_lost());
    }

    #[test]
    fn counters_are_independent() {
        let mut tally = HitTally::new();
        tally.increment_hit();
        tally.increment_hit();
        tally.increment_miss();
        assert_eq!(tally.hits(), 2);
        assert_eq!(tally.misses(), 1);
    }

    #[test]
    fn win_threshold_is_reached_on_tenth_hit() {
        let mut tally = HitTally::new();
        for _ in 0..HIT_GOAL - 1 {
            tally.increment_hit();
        }
        assert!(!tally.has_won());
        tally.increment_hit();
        assert!(tally.has_won());
        assert!(!tally.has_lost());
    }

    #[test]
    fn loss_threshold_is_reached_on_fifth_miss() {
        let mut tally = HitTally::new();
        for _ in 0..MISS_LIMIT - 1 {
            tally.increment_miss();
        }
        assert!(!tally.has_lost());
        tally.increment_miss();
        assert!(tally.has_lost());
    }

    #[test]
    fn reset_zeroes_both_counters() {
        let mut tally = HitTally::new();
        tally.increment_hit();
        tally.increment_miss();
        tally.reset();
        assert_eq!(tally, HitTally::new());
    }

    #[test]
    fn counters_saturate_instead_of_wrapping() {
        let mut tally = HitTally {
            hits: u32::MAX,
            misses: u32::MAX,
        };
        tally.increment_hit();
        tally.increment_miss();
        assert_eq!(tally.hits(), u32::MAX);
        assert_eq!(tally.misses(), u32::MAX);
    }
}
