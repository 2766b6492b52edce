//! Cardinal facing directions.
//!
//! Screen coordinates are used throughout: +x points right, +y points down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Direction an agent is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Facing up
    Up,
    /// Facing down (default)
    #[default]
    Down,
    /// Facing left
    Left,
    /// Facing right
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Convert direction to a unit vector.
    #[must_use]
    pub const fn to_vec2(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Create direction from a movement vector.
    ///
    /// The dominant axis wins; exact diagonals resolve vertically.
    #[must_use]
    pub fn from_vec2(v: Vec2) -> Option<Self> {
        if v.x == 0.0 && v.y == 0.0 {
            return None;
        }

        if v.x.abs() > v.y.abs() {
            if v.x > 0.0 {
                Some(Direction::Right)
            } else {
                Some(Direction::Left)
            }
        } else if v.y > 0.0 {
            Some(Direction::Down)
        } else {
            Some(Direction::Up)
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Checks whether turning from `other` to `self` is a 180 degree reversal.
    #[must_use]
    pub fn is_reversal_of(self, other: Self) -> bool {
        self.opposite() == other
    }

    /// Checks whether this direction moves along the x axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec2_dominant_axis() {
        assert_eq!(Direction::from_vec2(Vec2::new(3.0, 1.0)), Some(Direction::Right));
        assert_eq!(Direction::from_vec2(Vec2::new(-3.0, 1.0)), Some(Direction::Left));
        assert_eq!(Direction::from_vec2(Vec2::new(0.5, 2.0)), Some(Direction::Down));
        assert_eq!(Direction::from_vec2(Vec2::new(0.5, -2.0)), Some(Direction::Up));
        assert_eq!(Direction::from_vec2(Vec2::ZERO), None);
    }

    #[test]
    fn test_vec2_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_vec2(dir.to_vec2()), Some(dir));
        }
    }

    #[test]
    fn test_opposite() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }
}
