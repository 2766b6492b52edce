//! Facing-direction debounce.

use trove_common::Direction;

/// Turns a noisy per-tick desired direction into a stable committed facing.
///
/// A new direction must be observed continuously for `confirm_time` seconds
/// before it is committed. Reversals are additionally held until
/// `min_reverse_steps` observations have passed since the last commit.
#[derive(Debug, Clone)]
pub struct DirectionDebounce {
    committed: Direction,
    candidate: Option<Direction>,
    candidate_time: f32,
    confirm_time: f32,
    steps_since_change: u32,
    min_reverse_steps: u32,
}

impl DirectionDebounce {
    /// Creates a debounce starting at `initial`.
    #[must_use]
    pub fn new(initial: Direction, confirm_time: f32, min_reverse_steps: u32) -> Self {
        Self {
            committed: initial,
            candidate: None,
            candidate_time: 0.0,
            confirm_time,
            steps_since_change: min_reverse_steps,
            min_reverse_steps,
        }
    }

    /// Currently committed direction.
    #[must_use]
    pub const fn committed(&self) -> Direction {
        self.committed
    }

    /// Direction waiting to be confirmed, if any.
    #[must_use]
    pub const fn candidate(&self) -> Option<Direction> {
        self.candidate
    }

    /// Feeds one tick's desired direction and returns the committed one.
    pub fn observe(&mut self, raw: Direction, dt: f32) -> Direction {
        self.steps_since_change = self.steps_since_change.saturating_add(1);

        if raw == self.committed {
            self.candidate = None;
            self.candidate_time = 0.0;
            return self.committed;
        }

        if self.candidate == Some(raw) {
            self.candidate_time += dt;
        } else {
            self.candidate = Some(raw);
            self.candidate_time = dt;
        }

        if self.candidate_time < self.confirm_time {
            return self.committed;
        }
        if raw.is_reversal_of(self.committed) && self.steps_since_change < self.min_reverse_steps {
            return self.committed;
        }

        self.committed = raw;
        self.candidate = None;
        self.candidate_time = 0.0;
        self.steps_since_change = 0;
        self.committed
    }

    /// Forces the committed direction, dropping any candidate.
    pub fn reset(&mut self, direction: Direction) {
        self.committed = direction;
        self.candidate = None;
        self.candidate_time = 0.0;
        self.steps_since_change = self.min_reverse_steps;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_commits_after_confirm_time() {
        let mut debounce = DirectionDebounce::new(Direction::Down, 0.1, 0);
        assert_eq!(debounce.observe(Direction::Left, 0.05), Direction::Down);
        assert_eq!(debounce.candidate(), Some(Direction::Left));
        assert_eq!(debounce.observe(Direction::Left, 0.05), Direction::Left);
        assert_eq!(debounce.candidate(), None);
    }

    #[test]
    fn test_toggle_never_commits() {
        let mut debounce = DirectionDebounce::new(Direction::Down, 0.1, 4);
        for i in 0..200 {
            let raw = if i % 2 == 0 { Direction::Left } else { Direction::Right };
            assert_eq!(debounce.observe(raw, 0.05), Direction::Down);
        }
    }

    #[test]
    fn test_matching_raw_clears_candidate() {
        let mut debounce = DirectionDebounce::new(Direction::Up, 0.1, 0);
        debounce.observe(Direction::Left, 0.06);
        debounce.observe(Direction::Up, 0.06);
        // The earlier Left time does not carry over.
        assert_eq!(debounce.observe(Direction::Left, 0.06), Direction::Up);
    }

    #[test]
    fn test_reversal_held_until_min_steps() {
        let mut debounce = DirectionDebounce::new(Direction::Down, 0.0, 4);
        assert_eq!(debounce.observe(Direction::Left, 0.01), Direction::Left);
        // Right reverses Left; held for the next three observations.
        assert_eq!(debounce.observe(Direction::Right, 0.01), Direction::Left);
        assert_eq!(debounce.observe(Direction::Right, 0.01), Direction::Left);
        assert_eq!(debounce.observe(Direction::Right, 0.01), Direction::Left);
        assert_eq!(debounce.observe(Direction::Right, 0.01), Direction::Right);
    }

    #[test]
    fn test_perpendicular_turn_not_held() {
        let mut debounce = DirectionDebounce::new(Direction::Down, 0.0, 10);
        assert_eq!(debounce.observe(Direction::Left, 0.01), Direction::Left);
        assert_eq!(debounce.observe(Direction::Up, 0.01), Direction::Up);
    }

    proptest! {
        #[test]
        fn prop_short_toggles_never_commit(
            dt in 0.001f32..0.049,
            ticks in 1usize..400,
        ) {
            let mut debounce = DirectionDebounce::new(Direction::Up, 0.1, 4);
            for i in 0..ticks {
                let raw = if i % 2 == 0 { Direction::Left } else { Direction::Down };
                prop_assert_eq!(debounce.observe(raw, dt), Direction::Up);
            }
        }
    }
}
